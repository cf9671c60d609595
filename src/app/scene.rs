use eframe::egui::{Color32, Pos2, Rect, vec2};
use indexmap::IndexMap;

use crate::hierarchy::NodeId;

use super::constants::{CARD_HEIGHT, CARD_WIDTH};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct StrokeSegment {
    pub(in crate::app) from: Pos2,
    pub(in crate::app) to: Pos2,
    pub(in crate::app) color: Color32,
    pub(in crate::app) width: f32,
}

/// A vector layer that is cleared and fully redrawn, never patched.
#[derive(Debug, Default)]
pub(in crate::app) struct StrokeLayer {
    segments: Vec<StrokeSegment>,
}

impl StrokeLayer {
    pub(in crate::app) fn clear(&mut self) {
        self.segments.clear();
    }

    pub(in crate::app) fn push(&mut self, segment: StrokeSegment) {
        self.segments.push(segment);
    }

    pub(in crate::app) fn segments(&self) -> &[StrokeSegment] {
        &self.segments
    }

    pub(in crate::app) fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// On-screen container of one node card.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct NodeVisual {
    pub(in crate::app) id: NodeId,
    pub(in crate::app) primary: String,
    pub(in crate::app) secondary: String,
    pub(in crate::app) depth: usize,
    pub(in crate::app) expandable: bool,
    pub(in crate::app) collapsed: bool,
    pub(in crate::app) highlighted: bool,
    pub(in crate::app) position: Pos2,
    pub(in crate::app) opacity: f32,
    pub(in crate::app) scale: f32,
}

impl NodeVisual {
    /// Card bounds in world space, including the current animation scale.
    pub(in crate::app) fn bounds(&self) -> Rect {
        Rect::from_center_size(
            self.position,
            vec2(CARD_WIDTH, CARD_HEIGHT) * self.scale,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(in crate::app) struct VisualHandle(u64);

#[derive(Debug)]
struct ExitingVisual {
    handle: VisualHandle,
    visual: NodeVisual,
}

/// Retained drawing surface. Painted back to front: static edges, animated
/// edges, highlight overlay, node cards, exiting cards.
#[derive(Debug, Default)]
pub(in crate::app) struct Scene {
    pub(in crate::app) edges: StrokeLayer,
    pub(in crate::app) animated_edges: StrokeLayer,
    pub(in crate::app) highlight: StrokeLayer,
    pub(in crate::app) nodes: IndexMap<NodeId, NodeVisual>,
    exiting: Vec<ExitingVisual>,
    next_handle: u64,
}

impl Scene {
    /// Detaches a node card from the node layer and parks it in the exit layer.
    pub(in crate::app) fn move_to_exit_layer(&mut self, id: NodeId) -> Option<VisualHandle> {
        let visual = self.nodes.shift_remove(&id)?;
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.exiting.push(ExitingVisual { handle, visual });
        Some(handle)
    }

    pub(in crate::app) fn exiting_mut(&mut self, handle: VisualHandle) -> Option<&mut NodeVisual> {
        self.exiting
            .iter_mut()
            .find(|entry| entry.handle == handle)
            .map(|entry| &mut entry.visual)
    }

    pub(in crate::app) fn remove_exiting(&mut self, handles: &[VisualHandle]) {
        self.exiting.retain(|entry| !handles.contains(&entry.handle));
    }

    pub(in crate::app) fn exiting(&self) -> impl Iterator<Item = &NodeVisual> {
        self.exiting.iter().map(|entry| &entry.visual)
    }

    pub(in crate::app) fn exiting_len(&self) -> usize {
        self.exiting.len()
    }

    /// Topmost card under a world-space point.
    pub(in crate::app) fn node_at(&self, world: Pos2) -> Option<NodeId> {
        self.nodes
            .values()
            .rev()
            .find(|visual| visual.bounds().contains(world))
            .map(|visual| visual.id)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    fn visual(id: NodeId, position: Pos2) -> NodeVisual {
        NodeVisual {
            id,
            primary: String::new(),
            secondary: String::new(),
            depth: 0,
            expandable: false,
            collapsed: false,
            highlighted: false,
            position,
            opacity: 1.0,
            scale: 1.0,
        }
    }

    #[test]
    fn exit_layer_keeps_handles_distinct() {
        let mut scene = Scene::default();
        scene.nodes.insert(1, visual(1, pos2(0.0, 0.0)));
        let first = scene.move_to_exit_layer(1).expect("node 1 is on the node layer");

        scene.nodes.insert(1, visual(1, pos2(0.0, 0.0)));
        let second = scene.move_to_exit_layer(1).expect("node 1 is back on the node layer");

        assert_ne!(first, second);
        assert_eq!(scene.exiting_len(), 2);
        assert!(scene.nodes.is_empty());

        scene.remove_exiting(&[first]);
        assert_eq!(scene.exiting_len(), 1);
        assert!(scene.exiting_mut(first).is_none());
        assert!(scene.exiting_mut(second).is_some());
    }

    #[test]
    fn missing_node_is_not_moved() {
        let mut scene = Scene::default();
        assert!(scene.move_to_exit_layer(9).is_none());
        assert_eq!(scene.exiting_len(), 0);
    }

    #[test]
    fn hit_test_prefers_topmost_card() {
        let mut scene = Scene::default();
        scene.nodes.insert(1, visual(1, pos2(0.0, 0.0)));
        scene.nodes.insert(2, visual(2, pos2(40.0, 0.0)));

        assert_eq!(scene.node_at(pos2(20.0, 0.0)), Some(2));
        assert_eq!(scene.node_at(pos2(-60.0, 0.0)), Some(1));
        assert_eq!(scene.node_at(pos2(0.0, 200.0)), None);
    }
}
