use std::collections::{HashMap, HashSet, VecDeque};

use eframe::egui::{Pos2, Vec2, pos2, vec2};
use indexmap::IndexMap;

use crate::hierarchy::{HierarchyNode, NodeId};

/// Flattened node record. `children` holds ids; the owning [`Layout`] is the
/// source of truth for the referenced nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub primary: String,
    pub secondary: String,
    pub children: Vec<NodeId>,
}

/// Node records keyed by id, in depth-first discovery order.
pub type Layout = IndexMap<NodeId, LayoutNode>;

#[derive(Clone, Debug)]
pub struct BuiltLayout {
    pub layout: Layout,
    pub roots: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSpacing {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            horizontal: 240.0,
            vertical: 170.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayout {
    pub positions: HashMap<NodeId, Pos2>,
    pub size: Vec2,
}

pub fn build_layout(nodes: &[HierarchyNode]) -> BuiltLayout {
    fn visit(
        node: &HierarchyNode,
        is_root: bool,
        layout: &mut Layout,
        roots: &mut Vec<NodeId>,
    ) {
        if layout.contains_key(&node.id) {
            tracing::warn!(id = node.id, "duplicate node id; keeping first occurrence");
        } else {
            layout.insert(
                node.id,
                LayoutNode {
                    id: node.id,
                    primary: node.primary.clone(),
                    secondary: node.secondary.clone(),
                    children: node.children.iter().map(|child| child.id).collect(),
                },
            );
        }

        if is_root && !roots.contains(&node.id) {
            roots.push(node.id);
        }

        for child in &node.children {
            visit(child, false, layout, roots);
        }
    }

    let mut layout = Layout::new();
    let mut roots = Vec::new();
    for node in nodes {
        visit(node, true, &mut layout, &mut roots);
    }

    if roots.is_empty() {
        roots = infer_roots(&layout);
    }
    if roots.is_empty()
        && let Some(first) = nodes.first()
    {
        roots.push(first.id);
    }

    BuiltLayout { layout, roots }
}

/// Nodes that never appear in any children list.
fn infer_roots(layout: &Layout) -> Vec<NodeId> {
    let children = layout
        .values()
        .flat_map(|node| node.children.iter().copied())
        .collect::<HashSet<_>>();

    layout
        .keys()
        .copied()
        .filter(|id| !children.contains(id))
        .collect()
}

/// Copy of `full` where every collapsed node has an empty children list.
pub fn visible_layout(full: &Layout, collapsed: &HashSet<NodeId>) -> Layout {
    full.values()
        .map(|node| {
            let children = if collapsed.contains(&node.id) {
                Vec::new()
            } else {
                node.children.clone()
            };
            (
                node.id,
                LayoutNode {
                    children,
                    ..node.clone()
                },
            )
        })
        .collect()
}

struct GridPlacer<'a> {
    layout: &'a Layout,
    grid: IndexMap<NodeId, (f32, f32)>,
    in_progress: HashSet<NodeId>,
    next_x: f32,
}

impl GridPlacer<'_> {
    fn place(&mut self, id: NodeId, depth: usize) -> f32 {
        if let Some(&(x, _)) = self.grid.get(&id) {
            return x;
        }
        let layout = self.layout;
        let Some(node) = layout.get(&id) else {
            return 0.0;
        };

        self.in_progress.insert(id);
        let children = node
            .children
            .iter()
            .copied()
            .filter(|child| layout.contains_key(child) && !self.in_progress.contains(child))
            .collect::<Vec<_>>();

        let child_xs = children
            .into_iter()
            .map(|child| self.place(child, depth + 1))
            .collect::<Vec<_>>();
        let x = match (child_xs.first(), child_xs.last()) {
            (Some(first), Some(last)) => (first + last) / 2.0,
            _ => {
                let x = self.next_x;
                self.next_x += 1.0;
                x
            }
        };

        self.in_progress.remove(&id);
        self.grid.insert(id, (x, depth as f32));
        x
    }
}

/// Assigns world coordinates to every node reachable from `roots`.
///
/// Leaves take consecutive integer slots; a parent sits midway between its
/// first and last child. Each root subtree is separated by one empty slot.
/// Nodes reachable twice keep their first placement.
pub fn layout_tree(layout: &Layout, roots: &[NodeId], spacing: LayoutSpacing) -> TreeLayout {
    let mut placer = GridPlacer {
        layout,
        grid: IndexMap::new(),
        in_progress: HashSet::new(),
        next_x: 0.0,
    };

    for &root in roots {
        placer.place(root, 0);
        placer.next_x += 1.0;
    }

    if placer.grid.is_empty() {
        return TreeLayout {
            positions: HashMap::new(),
            size: vec2(1.0, 1.0),
        };
    }

    let (mut min_x, mut max_x) = (f32::INFINITY, f32::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
    for &(x, y) in placer.grid.values() {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let positions = placer
        .grid
        .iter()
        .map(|(&id, &(x, y))| {
            (
                id,
                pos2(
                    (x - min_x) * spacing.horizontal,
                    (y - min_y) * spacing.vertical,
                ),
            )
        })
        .collect();

    TreeLayout {
        positions,
        size: vec2(
            ((max_x - min_x) * spacing.horizontal).max(1.0),
            ((max_y - min_y) * spacing.vertical).max(1.0),
        ),
    }
}

/// Breadth-first depth from all roots at once. The first discovery of a node
/// fixes its depth; ties go to the earlier root.
pub fn compute_depths(layout: &Layout, roots: &[NodeId]) -> HashMap<NodeId, usize> {
    let mut depths = HashMap::new();
    let mut queue = roots.iter().map(|&id| (id, 0usize)).collect::<VecDeque<_>>();

    while let Some((id, depth)) = queue.pop_front() {
        if depths.contains_key(&id) {
            continue;
        }
        depths.insert(id, depth);

        let Some(node) = layout.get(&id) else {
            continue;
        };
        for &child in &node.children {
            if !depths.contains_key(&child) {
                queue.push_back((child, depth + 1));
            }
        }
    }

    depths
}

/// child id -> parent id for every edge whose parent passes `include`.
/// The first parent found in layout order wins.
pub fn parent_map(layout: &Layout, include: impl Fn(NodeId) -> bool) -> HashMap<NodeId, NodeId> {
    let mut parents = HashMap::new();
    for node in layout.values() {
        if !include(node.id) {
            continue;
        }
        for &child in &node.children {
            parents.entry(child).or_insert(node.id);
        }
    }
    parents
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn node(id: NodeId, children: Vec<HierarchyNode>) -> HierarchyNode {
        HierarchyNode {
            id,
            primary: format!("word-{id}"),
            secondary: String::new(),
            children,
        }
    }

    fn spacing() -> LayoutSpacing {
        LayoutSpacing::default()
    }

    #[test]
    fn root_with_two_children() {
        let built = build_layout(&[node(1, vec![node(2, vec![]), node(3, vec![])])]);
        assert_eq!(built.roots, vec![1]);
        assert_eq!(built.layout[&1].children, vec![2, 3]);

        let tree = layout_tree(&built.layout, &built.roots, spacing());
        let (p1, p2, p3) = (
            tree.positions[&1],
            tree.positions[&2],
            tree.positions[&3],
        );
        assert_eq!(p2.y, 170.0);
        assert_eq!(p3.y, 170.0);
        assert_eq!(p1.y, 0.0);
        assert_eq!(p1.x, (p2.x + p3.x) / 2.0);
        assert_eq!(p1.x - p2.x, p3.x - p1.x);
        assert_eq!(tree.size, vec2(240.0, 170.0));
    }

    #[test]
    fn collapsing_hides_children_only_in_visible_layout() {
        let built = build_layout(&[node(1, vec![node(2, vec![]), node(3, vec![])])]);
        let collapsed = HashSet::from([1]);
        let visible = visible_layout(&built.layout, &collapsed);

        assert!(visible[&1].children.is_empty());
        assert_eq!(built.layout[&1].children, vec![2, 3]);

        let tree = layout_tree(&visible, &built.roots, spacing());
        assert_eq!(tree.positions.len(), 1);
        assert!(tree.positions.contains_key(&1));
        assert_eq!(tree.size, vec2(1.0, 1.0));
    }

    #[test]
    fn balanced_binary_tree_is_centered_over_children() {
        fn binary(id: NodeId, depth: u32) -> HierarchyNode {
            if depth == 0 {
                return node(id, Vec::new());
            }
            node(id, vec![binary(id * 2, depth - 1), binary(id * 2 + 1, depth - 1)])
        }

        let built = build_layout(&[binary(1, 3)]);
        let tree = layout_tree(&built.layout, &built.roots, spacing());
        let depths = compute_depths(&built.layout, &built.roots);
        assert_eq!(tree.positions.len(), 15);

        for (id, position) in &tree.positions {
            assert_eq!(position.y, depths[id] as f32 * 170.0, "node {id}");
            let children = &built.layout[id].children;
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                let expected = (tree.positions[first].x + tree.positions[last].x) / 2.0;
                assert_eq!(position.x, expected, "node {id}");
            }
        }
    }

    #[test]
    fn uneven_subtrees_center_over_span() {
        let built = build_layout(&[node(
            1,
            vec![
                node(2, vec![node(4, vec![]), node(5, vec![]), node(6, vec![])]),
                node(3, vec![]),
            ],
        )]);
        let tree = layout_tree(&built.layout, &built.roots, spacing());

        assert_eq!(tree.positions[&2].x, 240.0);
        assert_eq!(tree.positions[&3].x, 720.0);
        assert_eq!(tree.positions[&1].x, 480.0);
    }

    #[test]
    fn multiple_roots_leave_a_gap() {
        let built = build_layout(&[node(1, vec![]), node(2, vec![])]);
        assert_eq!(built.roots, vec![1, 2]);

        let tree = layout_tree(&built.layout, &built.roots, spacing());
        assert_eq!(tree.positions[&1].x, 0.0);
        assert_eq!(tree.positions[&2].x, 480.0);
        assert_eq!(tree.size.y, 1.0);
    }

    #[test]
    fn empty_input_has_no_roots() {
        let built = build_layout(&[]);
        assert!(built.roots.is_empty());
        assert!(built.layout.is_empty());

        let tree = layout_tree(&built.layout, &built.roots, spacing());
        assert!(tree.positions.is_empty());
        assert_eq!(tree.size, vec2(1.0, 1.0));
    }

    #[test]
    fn roots_are_inferred_from_child_lists() {
        let mut layout = Layout::new();
        for (id, children) in [(1, vec![2]), (2, vec![]), (3, vec![1])] {
            layout.insert(
                id,
                LayoutNode {
                    id,
                    primary: String::new(),
                    secondary: String::new(),
                    children,
                },
            );
        }
        assert_eq!(infer_roots(&layout), vec![3]);
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let built = build_layout(&[node(1, vec![node(2, vec![node(3, vec![])])]), node(2, vec![])]);
        assert_eq!(built.layout.len(), 3);
        assert_eq!(built.layout[&2].children, vec![3]);
        assert_eq!(built.roots, vec![1, 2]);
    }

    #[test]
    fn cyclic_children_terminate() {
        let built = build_layout(&[node(1, vec![node(2, vec![node(1, vec![])])])]);
        assert_eq!(built.layout[&2].children, vec![1]);

        let tree = layout_tree(&built.layout, &built.roots, spacing());
        assert_eq!(tree.positions.len(), 2);

        let depths = compute_depths(&built.layout, &built.roots);
        assert_eq!(depths[&1], 0);
        assert_eq!(depths[&2], 1);
    }

    #[test]
    fn depth_is_first_discovery_across_roots() {
        let mut layout = Layout::new();
        for (id, children) in [(1, vec![3]), (2, vec![4]), (4, vec![3]), (3, vec![])] {
            layout.insert(
                id,
                LayoutNode {
                    id,
                    primary: String::new(),
                    secondary: String::new(),
                    children,
                },
            );
        }
        let depths = compute_depths(&layout, &[1, 2]);
        assert_eq!(depths[&3], 1);
        assert_eq!(depths[&4], 1);
    }

    #[test]
    fn parent_map_prefers_first_parent() {
        let mut layout = Layout::new();
        for (id, children) in [(1, vec![3]), (2, vec![3]), (3, vec![])] {
            layout.insert(
                id,
                LayoutNode {
                    id,
                    primary: String::new(),
                    secondary: String::new(),
                    children,
                },
            );
        }
        let parents = parent_map(&layout, |_| true);
        assert_eq!(parents.get(&3), Some(&1));

        let parents = parent_map(&layout, |id| id != 1);
        assert_eq!(parents.get(&3), Some(&2));
    }

    #[derive(Clone, Debug)]
    struct Shape(Vec<Shape>);

    fn shape() -> impl Strategy<Value = Shape> {
        Just(Shape(Vec::new())).prop_recursive(4, 40, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(Shape)
        })
    }

    fn materialize(shapes: &[Shape], next_id: &mut NodeId) -> Vec<HierarchyNode> {
        shapes
            .iter()
            .map(|shape| {
                let id = *next_id;
                *next_id += 1;
                let children = materialize(&shape.0, next_id);
                node(id, children)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn every_input_id_is_keyed_once(forest in prop::collection::vec(shape(), 0..4)) {
            let mut next_id = 1;
            let nodes = materialize(&forest, &mut next_id);
            let total = nodes.iter().map(HierarchyNode::subtree_len).sum::<usize>();

            let built = build_layout(&nodes);
            prop_assert_eq!(built.layout.len(), total);
            prop_assert_eq!(built.roots.is_empty(), nodes.is_empty());
            for id in 1..next_id {
                prop_assert!(built.layout.contains_key(&id));
            }
        }

        #[test]
        fn layout_is_deterministic(forest in prop::collection::vec(shape(), 1..4)) {
            let mut next_id = 1;
            let nodes = materialize(&forest, &mut next_id);
            let built = build_layout(&nodes);

            let first = layout_tree(&built.layout, &built.roots, spacing());
            let second = layout_tree(&built.layout, &built.roots, spacing());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn child_depth_is_parent_depth_plus_one(forest in prop::collection::vec(shape(), 1..4)) {
            let mut next_id = 1;
            let nodes = materialize(&forest, &mut next_id);
            let built = build_layout(&nodes);
            let depths = compute_depths(&built.layout, &built.roots);

            for root in &built.roots {
                prop_assert_eq!(depths[root], 0);
            }
            for node in built.layout.values() {
                for child in &node.children {
                    prop_assert_eq!(depths[child], depths[&node.id] + 1);
                }
            }
        }
    }
}
