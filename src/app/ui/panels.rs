use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use eframe::egui::{self, Align, Context, Layout as UiLayout, Vec2, vec2};

use crate::hierarchy::Dataset;
use crate::layout::{BuiltLayout, Layout, LayoutSpacing, build_layout, compute_depths, parent_map};

use super::super::animation::AnimationScheduler;
use super::super::graph::GestureMode;
use super::super::scene::Scene;
use super::super::viewport::Viewport;
use super::super::{ViewModel, ViewOptions};

impl ViewModel {
    pub(in crate::app) fn new(dataset: Dataset, options: ViewOptions) -> Self {
        let BuiltLayout { layout, roots } = build_layout(&dataset.roots);
        let full_parents = parent_map(&layout, |_| true);

        let mut collapsed = HashSet::new();
        if let Some(limit) = options.collapse_depth {
            let depths = compute_depths(&layout, &roots);
            collapsed.extend(
                layout
                    .values()
                    .filter(|node| {
                        !node.children.is_empty()
                            && depths.get(&node.id).is_some_and(|&depth| depth >= limit)
                    })
                    .map(|node| node.id),
            );
        }

        tracing::info!(
            dataset = %dataset.label,
            nodes = layout.len(),
            roots = roots.len(),
            collapsed = collapsed.len(),
            "building tree view"
        );

        let mut model = Self {
            dataset_label: dataset.label,
            full_layout: layout,
            full_parents,
            roots,
            collapsed,
            current_layout: Layout::default(),
            positions: HashMap::new(),
            depths: HashMap::new(),
            parents: HashMap::new(),
            tree_size: vec2(1.0, 1.0),
            spacing: LayoutSpacing::default(),
            scene: Scene::default(),
            viewport: Viewport::default(),
            viewport_size: Vec2::ZERO,
            fit_padding: options.fit_padding,
            gesture: GestureMode::default(),
            has_user_panned: false,
            selected: None,
            animations: AnimationScheduler::default(),
            entering_active: HashSet::new(),
            time_origin: None,
            clock: Duration::ZERO,
            search: String::new(),
            search_match_cache: None,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        };
        model.render_all();
        model
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("word-tree");
                    ui.separator();
                    ui.label(format!("dataset: {}", self.dataset_label));
                    ui.label(self.visible_tree_text());
                    ui.label(format!("zoom: {:.0}%", self.viewport.scale * 100.0));
                    if ui.button("Fit").clicked() {
                        self.fit_to_screen();
                    }
                    if ui.button("Collapse all").clicked() {
                        self.collapse_all();
                    }
                    if ui.button("Reset").clicked() {
                        self.reset_view();
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.separator();
                    self.draw_search(ui);
                    ui.with_layout(UiLayout::right_to_left(Align::Center), |ui| {
                        ui.checkbox(&mut self.show_fps_bar, "FPS");
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if is_loading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Reloading word tree...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    self.draw_graph(ui);
                }
            });
    }
}
