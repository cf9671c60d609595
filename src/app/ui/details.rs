use eframe::egui::{RichText, Ui};

use crate::hierarchy::NodeId;

use super::super::ViewModel;
use super::super::highlight::path_to_root;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected) = self.selected else {
            ui.label("Tap a card to select it.");
            ui.label("Tapping a card with children also collapses or expands it.");
            return;
        };

        let Some(node) = self.full_layout.get(&selected) else {
            ui.label("Selected node no longer exists in the hierarchy.");
            return;
        };

        let primary = node.primary.clone();
        let secondary = node.secondary.clone();
        let child_count = node.children.len();
        let depth = self.depths.get(&selected).copied();
        let collapsed = self.collapsed.contains(&selected);

        ui.label(RichText::new(primary).strong().size(20.0));
        if !secondary.is_empty() {
            ui.label(secondary);
        }
        ui.small(format!("id {selected}"));
        ui.add_space(6.0);

        if let Some(depth) = depth {
            ui.label(format!("Depth: {depth}"));
        }
        ui.label(format!("Children: {child_count}"));

        if child_count > 0 {
            let action = if collapsed { "Expand" } else { "Collapse" };
            ui.label(if collapsed { "State: collapsed" } else { "State: expanded" });
            if ui.button(action).clicked() {
                self.toggle_collapse(selected);
            }
        }

        ui.separator();
        ui.label(RichText::new("Path from root").strong());

        let mut pending = None;
        for (level, (id, label)) in self.breadcrumb(selected).into_iter().enumerate() {
            ui.horizontal(|ui| {
                ui.add_space(level as f32 * 12.0);
                if id == selected {
                    ui.label(RichText::new(label).strong());
                } else if ui.link(label).clicked() {
                    pending = Some(id);
                }
            });
        }

        if let Some(id) = pending {
            self.select(id);
        }
    }

    /// Root-first chain of (id, primary text) down to `id`.
    fn breadcrumb(&self, id: NodeId) -> Vec<(NodeId, String)> {
        let mut chain = path_to_root(&self.full_parents, id)
            .into_iter()
            .filter_map(|id| {
                self.full_layout
                    .get(&id)
                    .map(|node| (id, node.primary.clone()))
            })
            .collect::<Vec<_>>();
        chain.reverse();
        chain
    }

    pub(in crate::app) fn select(&mut self, id: NodeId) {
        if self.positions.contains_key(&id) {
            self.selected = Some(id);
            self.highlight_path(id);
        } else {
            self.reveal(id);
        }
    }
}
