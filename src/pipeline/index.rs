use std::collections::{HashMap, HashSet};

use crate::graph::{Edge, Endpoint, Node};

/// Normalizes an edge endpoint to the id it refers to.
pub fn resolve_endpoint_id(endpoint: &Endpoint) -> &str {
    endpoint.id()
}

/// Degree counts and undirected adjacency, rebuilt from scratch for every run.
#[derive(Clone, Debug, Default)]
pub struct ConnectivityIndex {
    degrees: HashMap<String, usize>,
    adjacency: HashMap<String, HashSet<String>>,
    max_degree: usize,
}

impl ConnectivityIndex {
    pub fn build(nodes: &[Node], edges: &[Edge]) -> Self {
        let mut degrees = HashMap::with_capacity(nodes.len());
        let mut adjacency: HashMap<String, HashSet<String>> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            degrees.insert(node.id.clone(), 0usize);
        }

        for edge in edges {
            let source = resolve_endpoint_id(&edge.source);
            let target = resolve_endpoint_id(&edge.target);

            // A self-loop lands here twice and counts as degree two.
            for endpoint in [source, target] {
                *degrees.entry(endpoint.to_owned()).or_insert(0) += 1;
            }

            adjacency
                .entry(source.to_owned())
                .or_default()
                .insert(target.to_owned());
            adjacency
                .entry(target.to_owned())
                .or_default()
                .insert(source.to_owned());
        }

        let max_degree = degrees.values().copied().max().unwrap_or(0);

        Self {
            degrees,
            adjacency,
            max_degree,
        }
    }

    pub fn degree(&self, id: &str) -> usize {
        self.degrees.get(id).copied().unwrap_or(0)
    }

    pub fn neighbors(&self, id: &str) -> Option<&HashSet<String>> {
        self.adjacency.get(id)
    }

    pub fn is_neighbor(&self, id: &str, other: &str) -> bool {
        self.adjacency
            .get(id)
            .is_some_and(|neighbors| neighbors.contains(other))
    }

    /// Highest degree across every id the index has seen.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Node ids ordered by descending degree, ties broken by id.
    pub fn top_by_degree(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked = self
            .degrees
            .iter()
            .map(|(id, degree)| (id.as_str(), *degree))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }
}
