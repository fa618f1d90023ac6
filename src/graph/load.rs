use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{GraphError, Result};

use super::model::{Edge, KnowledgeGraph, Node};

#[derive(Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default, alias = "links")]
    edges: Vec<Edge>,
}

pub fn load_graph(path: &Path) -> Result<KnowledgeGraph> {
    let raw = fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let graph = parse_graph(&raw, &path.display().to_string())?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded knowledge graph"
    );
    Ok(graph)
}

/// Parses graph JSON; `context` only names the source in errors.
pub fn parse_graph(raw: &str, context: &str) -> Result<KnowledgeGraph> {
    let parsed: RawGraph = serde_json::from_str(raw).map_err(|source| GraphError::Parse {
        context: context.to_owned(),
        source,
    })?;

    let mut seen = HashSet::with_capacity(parsed.nodes.len());
    for node in &parsed.nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(GraphError::DuplicateNodeId(node.id.clone()));
        }
    }

    let dangling = parsed
        .edges
        .iter()
        .flat_map(|edge| [edge.source.id(), edge.target.id()])
        .filter(|id| !seen.contains(id))
        .count();
    if dangling > 0 {
        warn!(dangling, "edges reference node ids missing from the node list");
    }

    let nodes = parsed
        .nodes
        .into_iter()
        .map(|mut node| {
            if node.name.is_empty() {
                node.name = node.id.clone();
            }
            node
        })
        .collect();

    Ok(KnowledgeGraph::new(nodes, parsed.edges))
}
