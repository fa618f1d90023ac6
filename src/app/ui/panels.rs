use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, Vec2};
use kg_lens::pipeline::ConnectivityIndex;
use kg_lens::{KnowledgeGraph, VisibilitySettings};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) const INITIAL_RANKING_ROWS: usize = 20;
    pub(in crate::app) const RANKING_PAGE_ROWS: usize = 20;
    pub(in crate::app) const RANKING_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(graph: KnowledgeGraph, settings: VisibilitySettings) -> Self {
        let connectivity = ConnectivityIndex::build(&graph.nodes, &graph.edges);
        let top_connected = connectivity
            .top_by_degree(graph.node_count())
            .into_iter()
            .filter(|(id, _)| graph.contains(id))
            .map(|(id, degree)| (id.to_owned(), degree))
            .collect();

        Self {
            graph,
            settings,
            search: String::new(),
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            live_physics: true,
            graph_dirty: true,
            render_graph_revision: 0,
            graph_cache: None,
            search_match_cache: None,
            connectivity,
            top_connected,
            ranking_rows_visible: Self::INITIAL_RANKING_ROWS,
        }
    }

    /// Keeps viewport, search and selection across a reload. A selected id
    /// missing from the new graph is dropped.
    pub(in crate::app) fn carry_view_from(&mut self, previous: &ViewModel) {
        self.pan = previous.pan;
        self.zoom = previous.zoom;
        self.live_physics = previous.live_physics;
        self.search = previous.search.clone();
        self.selected = previous
            .selected
            .clone()
            .filter(|id| self.graph.contains(id));
        self.graph_dirty = true;
    }

    fn visible_graph_text(&self) -> Option<String> {
        let cache = self.graph_cache.as_ref()?;
        Some(format!(
            "visible: {} nodes / {} edges ({} filtered)",
            cache.nodes.len(),
            cache.edges.len(),
            cache.hidden_node_count
        ))
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        graph_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("kg-lens");
                    ui.separator();
                    ui.label(format!("file: {}", graph_path.display()));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    ui.label(format!("zoom: {:.2}", self.zoom));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload graph"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reset view").clicked() {
                        self.pan = Vec2::ZERO;
                        self.zoom = 1.0;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(text) = self.visible_graph_text() {
                            ui.label(text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading knowledge graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    /// Selection changes re-run the pipeline so the selection and its
    /// neighbors are always part of the rendered subset.
    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }

        self.selected = selected;
        self.graph_dirty = true;
    }
}
