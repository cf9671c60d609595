use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context, Pos2, Vec2};

use crate::hierarchy::{Dataset, DatasetSource, NodeId, load_dataset};
use crate::layout::{Layout, LayoutSpacing};

mod animation;
mod constants;
mod geometry;
mod graph;
mod highlight;
mod render_utils;
mod scene;
mod ui;
mod viewport;

use self::animation::AnimationScheduler;
use self::graph::GestureMode;
use self::scene::Scene;
use self::viewport::Viewport;

/// Startup options for the tree view, resolved from the command line.
#[derive(Clone, Copy, Debug)]
pub struct ViewOptions {
    pub fit_padding: f32,
    pub collapse_depth: Option<usize>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            fit_padding: constants::DEFAULT_FIT_PADDING,
            collapse_depth: None,
        }
    }
}

pub struct WordTreeApp {
    source: DatasetSource,
    options: ViewOptions,
    state: AppState,
    reload_rx: Option<Receiver<Result<Dataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Dataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    dataset_label: String,
    full_layout: Layout,
    full_parents: HashMap<NodeId, NodeId>,
    roots: Vec<NodeId>,
    collapsed: HashSet<NodeId>,
    current_layout: Layout,
    positions: HashMap<NodeId, Pos2>,
    depths: HashMap<NodeId, usize>,
    parents: HashMap<NodeId, NodeId>,
    tree_size: Vec2,
    spacing: LayoutSpacing,
    scene: Scene,
    viewport: Viewport,
    viewport_size: Vec2,
    fit_padding: f32,
    gesture: GestureMode,
    has_user_panned: bool,
    selected: Option<NodeId>,
    animations: AnimationScheduler,
    entering_active: HashSet<NodeId>,
    time_origin: Option<f64>,
    clock: Duration,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

struct SearchMatchCache {
    query: String,
    best: Option<NodeId>,
    matches: Arc<HashSet<NodeId>>,
}

impl WordTreeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: DatasetSource,
        options: ViewOptions,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: DatasetSource) -> Receiver<Result<Dataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&source).map_err(|error| format!("{error:#}"));
            if let Err(error) = &result {
                tracing::warn!(%error, "dataset load failed");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: DatasetSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(&self, dataset: Dataset) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(dataset, self.options)))
    }
}

impl eframe::App for WordTreeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(result);
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading word tree...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the word tree");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        retry = true;
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.reload_rx = None;
            self.state = Self::start_load(self.source.clone());
            return;
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(dataset) => self.ready(dataset),
                Err(error) => AppState::Error(error),
            };
        }
    }
}
