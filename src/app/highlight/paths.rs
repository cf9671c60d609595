use std::collections::{HashMap, HashSet};

use crate::hierarchy::NodeId;

/// Walks `parents` from `target` upward. The result starts at `target` and
/// ends at the first node with no recorded parent; a repeated node ends the
/// walk early.
pub(in crate::app) fn path_to_root(
    parents: &HashMap<NodeId, NodeId>,
    target: NodeId,
) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut seen = HashSet::from([target]);
    let mut cursor = target;

    while let Some(&parent) = parents.get(&cursor) {
        if !seen.insert(parent) {
            break;
        }
        path.push(parent);
        cursor = parent;
    }

    path
}
