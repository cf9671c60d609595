use serde::Deserialize;

pub type NodeId = u64;

/// One entry of the input forest. Immutable once loaded.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HierarchyNode {
    pub id: NodeId,
    #[serde(alias = "el")]
    pub primary: String,
    #[serde(default, alias = "ru")]
    pub secondary: String,
    #[serde(default, alias = "a")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(HierarchyNode::subtree_len)
            .sum::<usize>()
    }
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub label: String,
    pub roots: Vec<HierarchyNode>,
}

impl Dataset {
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(HierarchyNode::subtree_len).sum()
    }
}
