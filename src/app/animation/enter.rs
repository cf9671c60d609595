use std::collections::{HashMap, HashSet};
use std::time::Duration;

use eframe::egui::{Pos2, vec2};

use crate::hierarchy::NodeId;

use super::super::constants::{
    CARD_HEIGHT, CONNECTOR_OFFSET, EDGE_WIDTH, ENTER_DURATION, ENTER_STAGGER, ENTER_START_SCALE,
};
use super::super::geometry::EdgeCurve;
use super::super::render_utils::{depth_color, push_gradient_curve};
use super::super::scene::Scene;
use super::{FrameContext, FrameTask, TaskStatus, ease_out_cubic, progress};

struct Slot {
    id: NodeId,
    target: Pos2,
    delay: Duration,
}

/// Staggered fade/scale-in where each card travels down the curve its edge
/// will occupy. Cards without a placed parent snap and take no stagger slot.
pub(in crate::app) struct EntranceAnimation {
    started_at: Duration,
    slots: Vec<Slot>,
}

/// Card center when its top connector sits at `eased` along `curve`.
fn travel_position(curve: &EdgeCurve, eased: f32) -> Pos2 {
    curve.point_at(eased) + vec2(0.0, CARD_HEIGHT / 2.0 + CONNECTOR_OFFSET)
}

impl EntranceAnimation {
    pub(super) fn begin(
        started_at: Duration,
        order: &[NodeId],
        targets: &HashMap<NodeId, Pos2>,
        scene: &mut Scene,
        parents: &HashMap<NodeId, NodeId>,
    ) -> Self {
        let mut slots = Vec::new();
        for &id in order {
            let Some(&target) = targets.get(&id) else {
                continue;
            };
            let Some(visual) = scene.nodes.get_mut(&id) else {
                continue;
            };

            match parents.get(&id).and_then(|parent| targets.get(parent)) {
                Some(&parent_target) => {
                    visual.opacity = 0.0;
                    visual.scale = ENTER_START_SCALE;
                    visual.position =
                        travel_position(&EdgeCurve::between(parent_target, target), 0.0);
                    let delay = ENTER_STAGGER * slots.len() as u32;
                    slots.push(Slot { id, target, delay });
                }
                None => {
                    visual.position = target;
                    visual.opacity = 1.0;
                    visual.scale = 1.0;
                }
            }
        }

        Self { started_at, slots }
    }

    pub(super) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Drops slots for cards the task no longer owns. Remaining slots keep
    /// their original stagger delay.
    pub(super) fn retain(&mut self, owned: &HashSet<NodeId>) {
        self.slots.retain(|slot| owned.contains(&slot.id));
    }
}

impl FrameTask for EntranceAnimation {
    fn poll(&mut self, scene: &mut Scene, frame: &FrameContext<'_>) -> TaskStatus {
        let elapsed = frame.now.saturating_sub(self.started_at);
        let mut done = true;

        scene.animated_edges.clear();
        for slot in &self.slots {
            let Some(visual) = scene.nodes.get_mut(&slot.id) else {
                continue;
            };
            let target = frame.positions.get(&slot.id).copied().unwrap_or(slot.target);

            let Some(local) = elapsed.checked_sub(slot.delay) else {
                visual.opacity = 0.0;
                visual.scale = ENTER_START_SCALE;
                done = false;
                continue;
            };

            let t = progress(local, ENTER_DURATION);
            let eased = if t < 1.0 { ease_out_cubic(t) } else { 1.0 };
            if t < 1.0 {
                done = false;
            }
            visual.opacity = eased;
            visual.scale = ENTER_START_SCALE + (1.0 - ENTER_START_SCALE) * eased;

            let parent = frame.parents.get(&slot.id).copied();
            match parent.and_then(|parent| frame.positions.get(&parent).map(|p| (parent, *p))) {
                Some((parent, parent_position)) => {
                    let curve = EdgeCurve::between(parent_position, target);
                    let from_depth = frame.depths.get(&parent).copied().unwrap_or(0);
                    let to_depth = frame
                        .depths
                        .get(&slot.id)
                        .copied()
                        .unwrap_or(from_depth + 1);
                    push_gradient_curve(
                        &mut scene.animated_edges,
                        &curve,
                        depth_color(from_depth),
                        depth_color(to_depth),
                        EDGE_WIDTH,
                        eased,
                    );
                    visual.position = if t < 1.0 {
                        travel_position(&curve, eased)
                    } else {
                        target
                    };
                }
                None => visual.position = target,
            }
        }

        if !done {
            return TaskStatus::Running;
        }

        scene.animated_edges.clear();
        for slot in &self.slots {
            if let Some(visual) = scene.nodes.get_mut(&slot.id) {
                visual.position = frame.positions.get(&slot.id).copied().unwrap_or(slot.target);
                visual.opacity = 1.0;
                visual.scale = 1.0;
            }
        }
        TaskStatus::Finished
    }
}
