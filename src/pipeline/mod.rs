//! View reduction for the graph canvas.
//!
//! Every run starts from the full node and edge lists: the connectivity index is
//! rebuilt, the importance filter picks the visible subset, the style mapper
//! sizes it, and the detail level is derived from zoom alone.

mod detail;
mod filter;
mod index;
mod style;

use std::collections::HashMap;

use tracing::debug;

use crate::graph::{Edge, KnowledgeGraph, Node};
use crate::settings::VisibilitySettings;

pub use detail::{DetailLevel, detail_level};
pub use filter::{VisibleSet, degree_threshold, filter_visible};
pub use index::{ConnectivityIndex, resolve_endpoint_id};
pub use style::{LogScale, MIN_ZOOM, NodeRole, NodeStyle, StyleMapper, zoom_compensation};

#[derive(Clone, Debug)]
pub struct PipelineOutput<'a> {
    pub nodes: Vec<&'a Node>,
    pub edges: Vec<&'a Edge>,
    pub styles: HashMap<String, NodeStyle>,
    pub detail: DetailLevel,
    pub index: ConnectivityIndex,
}

impl PipelineOutput<'_> {
    pub fn style(&self, id: &str) -> Option<&NodeStyle> {
        self.styles.get(id)
    }
}

pub fn run_pipeline<'a>(
    graph: &'a KnowledgeGraph,
    selected: Option<&str>,
    settings: &VisibilitySettings,
    zoom: f32,
) -> PipelineOutput<'a> {
    let index = ConnectivityIndex::build(&graph.nodes, &graph.edges);
    let visible = filter_visible(&graph.nodes, &graph.edges, &index, selected, settings);
    let styles = StyleMapper::new(&index, settings).map_styles(&visible.nodes, selected, zoom);
    let detail = detail_level(zoom, &settings.detail);

    debug!(
        visible_nodes = visible.nodes.len(),
        visible_edges = visible.edges.len(),
        zoom,
        "pipeline run"
    );

    PipelineOutput {
        nodes: visible.nodes,
        edges: visible.edges,
        styles,
        detail,
        index,
    }
}
