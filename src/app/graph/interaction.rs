use eframe::egui::{Pos2, Vec2};

use crate::hierarchy::NodeId;

use super::super::ViewModel;
use super::super::constants::{DRAG_THRESHOLD, PAN_THRESHOLD, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

/// Pointer input in canvas-local screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum PointerEvent {
    Down { pos: Pos2 },
    Move { pos: Pos2 },
    Up { pos: Pos2 },
    /// Release delivered after the pointer left the canvas.
    UpOutside,
    /// Positive `delta_y` zooms out.
    Wheel { delta_y: f32, pos: Pos2 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) enum GestureMode {
    #[default]
    Idle,
    Panning {
        anchor: Pos2,
        offset_at_start: Vec2,
    },
    DraggingNode {
        id: NodeId,
        start_world: Pos2,
        grab_offset: Vec2,
        moved: bool,
        tap_candidate: bool,
    },
}

impl ViewModel {
    pub(in crate::app) fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { pos } => self.pointer_down(pos),
            PointerEvent::Move { pos } => self.pointer_move(pos),
            PointerEvent::Up { .. } | PointerEvent::UpOutside => self.pointer_up(),
            PointerEvent::Wheel { delta_y, pos } => self.wheel(delta_y, pos),
        }
    }

    pub(in crate::app) fn gesture_active(&self) -> bool {
        self.gesture != GestureMode::Idle
    }

    fn pointer_down(&mut self, pos: Pos2) {
        if matches!(self.gesture, GestureMode::DraggingNode { .. }) {
            return;
        }

        let world = self.viewport.screen_to_world(pos);
        let Some(id) = self.scene.node_at(world) else {
            self.gesture = GestureMode::Panning {
                anchor: pos,
                offset_at_start: self.viewport.offset,
            };
            return;
        };
        let Some(visual) = self.scene.nodes.get(&id) else {
            return;
        };

        let tap_candidate = self
            .full_layout
            .get(&id)
            .is_some_and(|node| !node.children.is_empty());
        self.gesture = GestureMode::DraggingNode {
            id,
            start_world: world,
            grab_offset: visual.position - world,
            moved: false,
            tap_candidate,
        };
    }

    fn pointer_move(&mut self, pos: Pos2) {
        match &mut self.gesture {
            GestureMode::Idle => {}
            GestureMode::Panning {
                anchor,
                offset_at_start,
            } => {
                let delta = pos - *anchor;
                self.viewport.offset = *offset_at_start + delta;
                if !self.has_user_panned
                    && (delta.x.abs() > PAN_THRESHOLD || delta.y.abs() > PAN_THRESHOLD)
                {
                    self.has_user_panned = true;
                    tracing::debug!("manual pan; wheel zoom now anchors on the pointer");
                }
            }
            GestureMode::DraggingNode {
                id,
                start_world,
                grab_offset,
                moved,
                ..
            } => {
                let id = *id;
                let world = self.viewport.screen_to_world(pos);
                let next = world + *grab_offset;
                if (world.x - start_world.x).abs() > DRAG_THRESHOLD
                    || (world.y - start_world.y).abs() > DRAG_THRESHOLD
                {
                    *moved = true;
                }

                let Some(visual) = self.scene.nodes.get_mut(&id) else {
                    return;
                };
                visual.position = next;
                self.positions.insert(id, next);
                self.redraw_static_edges();
                self.scene.highlight.clear();
            }
        }
    }

    fn pointer_up(&mut self) {
        let GestureMode::DraggingNode {
            id,
            moved,
            tap_candidate,
            ..
        } = std::mem::take(&mut self.gesture)
        else {
            return;
        };
        if moved {
            return;
        }

        self.selected = Some(id);
        self.highlight_path(id);
        if tap_candidate {
            self.toggle_collapse(id);
        }
    }

    /// One wheel tick. Until the user pans by hand, zoom anchors on the
    /// selected card (or the first root) so the tree stays put.
    fn wheel(&mut self, delta_y: f32, pointer: Pos2) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y > 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            ZOOM_IN_FACTOR
        };

        let anchor = if self.has_user_panned {
            pointer
        } else {
            self.selected
                .or_else(|| self.roots.first().copied())
                .and_then(|id| self.positions.get(&id))
                .map(|&world| self.viewport.world_to_screen(world))
                .unwrap_or(pointer)
        };

        self.viewport.zoom_at(anchor, factor);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use eframe::egui::{pos2, vec2};

    use crate::app::ViewOptions;
    use crate::app::constants::{MAX_SCALE, MIN_SCALE};
    use crate::hierarchy::{Dataset, HierarchyNode};

    use super::*;

    fn node(id: NodeId, children: Vec<HierarchyNode>) -> HierarchyNode {
        HierarchyNode {
            id,
            primary: id.to_string(),
            secondary: String::new(),
            children,
        }
    }

    /// Root 1 with children 2 and 3, settled, viewport at identity.
    fn settled_model() -> ViewModel {
        let mut model = ViewModel::new(
            Dataset {
                label: "test".to_owned(),
                roots: vec![node(1, vec![node(2, vec![]), node(3, vec![])])],
            },
            ViewOptions::default(),
        );
        model.clock = Duration::from_secs(1);
        model.tick_animations();
        model
    }

    fn screen_of(model: &ViewModel, id: NodeId) -> Pos2 {
        model.viewport.world_to_screen(model.positions[&id])
    }

    #[test]
    fn tap_on_parent_selects_and_collapses() {
        let mut model = settled_model();
        let at = screen_of(&model, 1);

        model.handle_pointer(PointerEvent::Down { pos: at });
        model.handle_pointer(PointerEvent::Move {
            pos: at + vec2(4.0, -5.0),
        });
        model.handle_pointer(PointerEvent::Up { pos: at });

        assert_eq!(model.selected, Some(1));
        assert!(model.collapsed.contains(&1));
        assert_eq!(model.scene.nodes.len(), 1);
        assert!(!model.gesture_active());
    }

    #[test]
    fn drag_past_threshold_neither_selects_nor_collapses() {
        let mut model = settled_model();
        let at = screen_of(&model, 1);

        model.handle_pointer(PointerEvent::Down { pos: at });
        model.handle_pointer(PointerEvent::Move {
            pos: at + vec2(30.0, 12.0),
        });
        model.handle_pointer(PointerEvent::Up {
            pos: at + vec2(30.0, 12.0),
        });

        assert_eq!(model.selected, None);
        assert!(model.collapsed.is_empty());
        assert_eq!(model.positions[&1], pos2(150.0, 12.0));
        assert_eq!(model.scene.nodes[&1].position, pos2(150.0, 12.0));
    }

    #[test]
    fn drag_keeps_grab_offset_and_redraws_edges() {
        let mut model = settled_model();
        model.highlight_path(2);
        let grab = screen_of(&model, 2) + vec2(10.0, 5.0);

        model.handle_pointer(PointerEvent::Down { pos: grab });
        model.handle_pointer(PointerEvent::Move {
            pos: grab + vec2(0.0, 40.0),
        });

        assert_eq!(model.positions[&2], pos2(0.0, 210.0));
        assert!(model.scene.highlight.is_empty());
        let last = model.scene.edges.segments().first().map(|segment| segment.from);
        assert_eq!(last, Some(pos2(120.0, 47.0)));
    }

    #[test]
    fn tap_on_leaf_selects_without_collapse() {
        let mut model = settled_model();
        let at = screen_of(&model, 3);

        model.handle_pointer(PointerEvent::Down { pos: at });
        model.handle_pointer(PointerEvent::UpOutside);

        assert_eq!(model.selected, Some(3));
        assert!(model.collapsed.is_empty());
        assert!(model.scene.nodes[&3].highlighted);
        assert!(model.scene.nodes[&1].highlighted);
        assert!(!model.scene.nodes[&2].highlighted);
    }

    #[test]
    fn pan_moves_viewport_and_marks_manual_framing() {
        let mut model = settled_model();
        let empty = pos2(-400.0, -400.0);

        model.handle_pointer(PointerEvent::Down { pos: empty });
        model.handle_pointer(PointerEvent::Move {
            pos: empty + vec2(2.0, 3.0),
        });
        assert_eq!(model.viewport.offset, vec2(2.0, 3.0));
        assert!(!model.has_user_panned);

        model.handle_pointer(PointerEvent::Move {
            pos: empty + vec2(25.0, -10.0),
        });
        model.handle_pointer(PointerEvent::Up {
            pos: empty + vec2(25.0, -10.0),
        });
        assert_eq!(model.viewport.offset, vec2(25.0, -10.0));
        assert!(model.has_user_panned);
        assert_eq!(model.selected, None);
    }

    #[test]
    fn wheel_anchors_on_first_root_until_panned() {
        let mut model = settled_model();
        let root_before = screen_of(&model, 1);

        model.handle_pointer(PointerEvent::Wheel {
            delta_y: -1.0,
            pos: pos2(900.0, 700.0),
        });
        assert!((model.viewport.scale - ZOOM_IN_FACTOR).abs() < 1e-6);
        let root_after = screen_of(&model, 1);
        assert!((root_after.x - root_before.x).abs() < 1e-3);
        assert!((root_after.y - root_before.y).abs() < 1e-3);

        model.has_user_panned = true;
        let pointer = pos2(900.0, 700.0);
        let world = model.viewport.screen_to_world(pointer);
        model.handle_pointer(PointerEvent::Wheel {
            delta_y: 3.0,
            pos: pointer,
        });
        let back = model.viewport.world_to_screen(world);
        assert!((back.x - pointer.x).abs() < 1e-3);
        assert!((back.y - pointer.y).abs() < 1e-3);
    }

    #[test]
    fn wheel_anchors_on_selection() {
        let mut model = settled_model();
        model.selected = Some(3);
        let before = screen_of(&model, 3);

        model.handle_pointer(PointerEvent::Wheel {
            delta_y: 1.0,
            pos: pos2(0.0, 0.0),
        });
        let after = screen_of(&model, 3);
        assert!((after.x - before.x).abs() < 1e-3);
        assert!((after.y - before.y).abs() < 1e-3);
    }

    #[test]
    fn zero_wheel_delta_is_ignored() {
        let mut model = settled_model();
        model.handle_pointer(PointerEvent::Wheel {
            delta_y: 0.0,
            pos: pos2(10.0, 10.0),
        });
        assert_eq!(model.viewport.scale, 1.0);
    }

    #[test]
    fn wheel_scale_stays_clamped() {
        let mut model = settled_model();
        for _ in 0..300 {
            model.handle_pointer(PointerEvent::Wheel {
                delta_y: -1.0,
                pos: pos2(10.0, 10.0),
            });
        }
        assert_eq!(model.viewport.scale, MAX_SCALE);

        for _ in 0..600 {
            model.handle_pointer(PointerEvent::Wheel {
                delta_y: 1.0,
                pos: pos2(10.0, 10.0),
            });
        }
        assert_eq!(model.viewport.scale, MIN_SCALE);
    }
}
