use crate::hierarchy::NodeId;

mod paths;

pub(in crate::app) use self::paths::path_to_root;
use super::ViewModel;
use super::constants::HIGHLIGHT_EDGE_WIDTH;
use super::geometry::EdgeCurve;
use super::render_utils::{depth_color, push_gradient_curve};

impl ViewModel {
    /// Restyles the cards and redraws the highlight layer for the chain from
    /// `target` up to its root. Hops with a missing position are skipped.
    pub(in crate::app) fn highlight_path(&mut self, target: NodeId) {
        for visual in self.scene.nodes.values_mut() {
            visual.highlighted = false;
        }
        self.scene.highlight.clear();

        let path = path_to_root(&self.parents, target);
        for hop in path.windows(2) {
            let &[child, parent] = hop else {
                continue;
            };
            let (Some(&from), Some(&to)) = (self.positions.get(&parent), self.positions.get(&child))
            else {
                continue;
            };
            let from_depth = self.depths.get(&parent).copied().unwrap_or(0);
            let to_depth = self.depths.get(&child).copied().unwrap_or(from_depth + 1);

            push_gradient_curve(
                &mut self.scene.highlight,
                &EdgeCurve::between(from, to),
                depth_color(from_depth),
                depth_color(to_depth),
                HIGHLIGHT_EDGE_WIDTH,
                1.0,
            );
        }

        for id in &path {
            if let Some(visual) = self.scene.nodes.get_mut(id) {
                visual.highlighted = true;
            }
        }
    }
}
