use std::collections::HashSet;

use eframe::egui::Vec2;

use crate::hierarchy::NodeId;
use crate::layout::{compute_depths, layout_tree, parent_map, visible_layout};

use super::super::ViewModel;
use super::super::animation::FrameContext;
use super::super::constants::EDGE_WIDTH;
use super::super::geometry::EdgeCurve;
use super::super::render_utils::{depth_color, push_gradient_curve};
use super::super::scene::NodeVisual;

impl ViewModel {
    /// Recomputes the visible layout from the collapsed set and rebuilds every
    /// scene layer from it. Cards that appeared or disappeared since the
    /// previous pass are handed to the animation scheduler.
    pub(in crate::app) fn render_all(&mut self) {
        let first_render = self.scene.nodes.is_empty();

        self.current_layout = visible_layout(&self.full_layout, &self.collapsed);
        self.depths = compute_depths(&self.current_layout, &self.roots);
        let tree = layout_tree(&self.current_layout, &self.roots, self.spacing);
        self.positions = tree.positions;
        self.tree_size = tree.size;

        let visible = self
            .current_layout
            .keys()
            .copied()
            .filter(|id| self.positions.contains_key(id))
            .collect::<Vec<_>>();

        let leaving = self
            .scene
            .nodes
            .keys()
            .copied()
            .filter(|id| !self.positions.contains_key(id))
            .collect::<Vec<_>>();
        let exit_handles = leaving
            .iter()
            .filter_map(|&id| self.scene.move_to_exit_layer(id))
            .collect::<Vec<_>>();
        let entering = visible
            .iter()
            .copied()
            .filter(|id| !self.scene.nodes.contains_key(id))
            .collect::<Vec<_>>();

        self.scene.edges.clear();
        self.scene.animated_edges.clear();
        self.scene.highlight.clear();
        self.scene.nodes.clear();

        self.parents = parent_map(&self.current_layout, |id| self.positions.contains_key(&id));

        // A running entrance keeps ownership of its own edges; late arrivals snap.
        if self.animations.entrance_in_flight() {
            self.entering_active
                .retain(|id| self.positions.contains_key(id));
            self.animations.retain_entering(&self.entering_active);
        } else {
            self.entering_active = entering.iter().copied().collect();
        }
        self.redraw_static_edges();

        for &id in &visible {
            let (Some(node), Some(&position)) =
                (self.current_layout.get(&id), self.positions.get(&id))
            else {
                continue;
            };
            let expandable = self
                .full_layout
                .get(&id)
                .is_some_and(|full| !full.children.is_empty());

            self.scene.nodes.insert(
                id,
                NodeVisual {
                    id,
                    primary: node.primary.clone(),
                    secondary: node.secondary.clone(),
                    depth: self.depths.get(&id).copied().unwrap_or(0),
                    expandable,
                    collapsed: self.collapsed.contains(&id),
                    highlighted: false,
                    position,
                    opacity: 1.0,
                    scale: 1.0,
                },
            );
        }

        if first_render {
            self.fit_to_screen();
        }

        match self.selected {
            Some(selected) if self.positions.contains_key(&selected) => {
                self.highlight_path(selected);
            }
            Some(_) => self.selected = None,
            None => {}
        }

        let entrance_started = !entering.is_empty()
            && self.animations.try_start_entrance(
                self.clock,
                &entering,
                &self.positions,
                &mut self.scene,
                &self.parents,
            );
        if !exit_handles.is_empty() {
            self.animations.start_exit(self.clock, exit_handles);
        }

        tracing::debug!(
            visible = visible.len(),
            entering = entering.len(),
            exiting = leaving.len(),
            entrance_started,
            "render pass"
        );
    }

    /// Clears the static edge layer and draws one gradient curve per visible
    /// parent/child pair, skipping children whose entrance owns their edge.
    pub(in crate::app) fn redraw_static_edges(&mut self) {
        self.scene.edges.clear();

        for node in self.current_layout.values() {
            let Some(&from) = self.positions.get(&node.id) else {
                continue;
            };
            let from_depth = self.depths.get(&node.id).copied().unwrap_or(0);

            for child in &node.children {
                if self.entering_active.contains(child) {
                    continue;
                }
                let Some(&to) = self.positions.get(child) else {
                    continue;
                };
                let to_depth = self.depths.get(child).copied().unwrap_or(from_depth + 1);

                push_gradient_curve(
                    &mut self.scene.edges,
                    &EdgeCurve::between(from, to),
                    depth_color(from_depth),
                    depth_color(to_depth),
                    EDGE_WIDTH,
                    1.0,
                );
            }
        }
    }

    pub(in crate::app) fn fit_to_screen(&mut self) {
        if self
            .viewport
            .fit(self.viewport_size, self.tree_size, self.fit_padding)
        {
            tracing::debug!(
                scale = self.viewport.scale,
                width = self.tree_size.x,
                height = self.tree_size.y,
                "fit tree to canvas"
            );
        }
    }

    /// Records the canvas size and refits when it changed.
    pub(in crate::app) fn set_viewport_size(&mut self, size: Vec2) {
        if size == self.viewport_size {
            return;
        }
        self.viewport_size = size;
        self.fit_to_screen();
    }

    /// Flips the collapse state of `id`. Expanding re-collapses the immediate
    /// children so only one level opens at a time.
    pub(in crate::app) fn toggle_collapse(&mut self, id: NodeId) {
        if self.collapsed.remove(&id) {
            if let Some(node) = self.full_layout.get(&id) {
                self.collapsed.extend(node.children.iter().copied());
            }
            tracing::debug!(id, "expanded node");
        } else {
            self.collapsed.insert(id);
            tracing::debug!(id, "collapsed node");
        }

        self.render_all();
    }

    /// Expands every collapsed ancestor of `id`, then selects it.
    pub(in crate::app) fn reveal(&mut self, id: NodeId) {
        if !self.full_layout.contains_key(&id) {
            return;
        }

        let mut seen = HashSet::from([id]);
        let mut cursor = id;
        while let Some(&parent) = self.full_parents.get(&cursor) {
            if !seen.insert(parent) {
                break;
            }
            self.collapsed.remove(&parent);
            cursor = parent;
        }

        self.selected = Some(id);
        tracing::debug!(id, "revealed node");
        self.render_all();
    }

    pub(in crate::app) fn collapse_all(&mut self) {
        let expandable_roots = self
            .roots
            .iter()
            .copied()
            .filter(|root| {
                self.full_layout
                    .get(root)
                    .is_some_and(|node| !node.children.is_empty())
            })
            .collect::<Vec<_>>();
        self.collapsed.extend(expandable_roots);
        self.render_all();
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.collapsed.clear();
        self.selected = None;
        self.render_all();
        self.fit_to_screen();
    }

    /// Polls every running animation task against the current clock.
    pub(in crate::app) fn tick_animations(&mut self) {
        if self.animations.is_idle() {
            return;
        }

        let frame = FrameContext {
            now: self.clock,
            positions: &self.positions,
            parents: &self.parents,
            depths: &self.depths,
        };
        let report = self.animations.tick(&mut self.scene, &frame);

        if report.exits_finished > 0 {
            tracing::trace!(
                batches = report.exits_finished,
                still_exiting = self.scene.exiting_len(),
                running_batches = self.animations.active_exit_batches(),
                "exit batches finished"
            );
        }
        if report.entrance_finished && !self.entering_active.is_empty() {
            self.entering_active.clear();
            self.redraw_static_edges();
        }
    }

    pub(in crate::app) fn is_animating(&self) -> bool {
        !self.animations.is_idle()
    }
}
