use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};
use kg_lens::pipeline::{ConnectivityIndex, DetailLevel, NodeRole, NodeStyle};
use kg_lens::{Category, KnowledgeGraph, VisibilitySettings, load_graph};
use tracing::{error, info};

mod graph;
mod physics;
mod render_utils;
mod ui;

type LoadResult = Result<KnowledgeGraph, String>;

pub struct KgLensApp {
    graph_path: PathBuf,
    settings: VisibilitySettings,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: KnowledgeGraph,
    settings: VisibilitySettings,
    search: String,
    selected: Option<String>,
    pan: Vec2,
    zoom: f32,
    live_physics: bool,
    graph_dirty: bool,
    render_graph_revision: u64,
    graph_cache: Option<RenderGraph>,
    search_match_cache: Option<SearchMatchCache>,
    connectivity: ConnectivityIndex,
    top_connected: Vec<(String, usize)>,
    ranking_rows_visible: usize,
}

struct SearchMatchCache {
    query: String,
    graph_revision: u64,
    matches: Arc<HashSet<usize>>,
}

struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
    index_by_id: HashMap<String, usize>,
    detail: DetailLevel,
    styled_zoom: f32,
    hidden_node_count: usize,
    physics_scratch: PhysicsScratch,
    view_scratch: ViewScratch,
}

struct PhysicsScratch {
    positions: Vec<Vec2>,
    forces: Vec<Vec2>,
}

struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
    visible_indices: Vec<usize>,
}

struct RenderNode {
    id: String,
    label: String,
    category: Category,
    world_pos: Vec2,
    velocity: Vec2,
    role: NodeRole,
    style: NodeStyle,
}

struct RenderEdge {
    source: usize,
    target: usize,
    relationship: String,
}

#[derive(Clone, Copy)]
struct PhysicsConfig {
    strength: f32,
    delta_seconds: f32,
}

impl KgLensApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        graph_path: PathBuf,
        settings: VisibilitySettings,
    ) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            settings,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph(&graph_path).map_err(|error| {
                error!(path = %graph_path.display(), %error, "graph load failed");
                describe_error(&error)
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: PathBuf) -> AppState {
        info!(path = %graph_path.display(), "loading graph");
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }

    /// Fresh graph data keeps the current selection and viewport.
    fn ready(&self, graph: KnowledgeGraph) -> AppState {
        let mut model = ViewModel::new(graph, self.settings);
        if let AppState::Ready(previous) = &self.state {
            model.carry_view_from(previous);
        }
        AppState::Ready(Box::new(model))
    }
}

fn poll_load(rx: &Receiver<LoadResult>) -> Option<LoadResult> {
    match rx.try_recv() {
        Ok(result) => Some(result),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            Some(Err("Background load worker disconnected".to_owned()))
        }
    }
}

fn describe_error(error: &dyn std::error::Error) -> String {
    let mut causes = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes.join(": ")
}

impl eframe::App for KgLensApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                transition = poll_load(rx);

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading knowledge graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load knowledge graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(self.graph_path.clone());
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.graph_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.settings = model.settings;
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match poll_load(&rx) {
                        Some(result) => transition = Some(result),
                        None => self.reload_rx = Some(rx),
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(graph) => self.ready(graph),
                Err(error) => AppState::Error(error),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_load_waits_then_delivers() {
        let (tx, rx) = mpsc::channel();
        assert!(poll_load(&rx).is_none());

        tx.send(Ok(KnowledgeGraph::default())).unwrap();
        assert!(matches!(poll_load(&rx), Some(Ok(_))));
    }

    #[test]
    fn poll_load_reports_dead_worker() {
        let (tx, rx) = mpsc::channel::<LoadResult>();
        drop(tx);
        assert!(matches!(
            poll_load(&rx),
            Some(Err(message)) if message.contains("disconnected")
        ));
    }
}
