use std::collections::HashSet;

use tracing::debug;

use crate::graph::{Edge, Node};
use crate::settings::VisibilitySettings;

use super::index::{ConnectivityIndex, resolve_endpoint_id};

/// Nodes and edges that survived filtering, in input order.
#[derive(Clone, Debug, Default)]
pub struct VisibleSet<'a> {
    pub nodes: Vec<&'a Node>,
    pub edges: Vec<&'a Edge>,
}

impl VisibleSet<'_> {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }
}

/// `max(floor, ln(n) / divisor)` with `n` clamped to at least 2.
pub fn degree_threshold(node_count: usize, settings: &VisibilitySettings) -> f32 {
    let count = node_count.max(2) as f32;
    let scale = settings.scale;
    (count.ln() / scale.degree_log_divisor).max(scale.degree_floor)
}

pub fn filter_visible<'a>(
    nodes: &'a [Node],
    edges: &'a [Edge],
    index: &ConnectivityIndex,
    selected: Option<&str>,
    settings: &VisibilitySettings,
) -> VisibleSet<'a> {
    let passed = if nodes.len() < settings.filter_threshold {
        debug!(nodes = nodes.len(), "graph below filter threshold, showing all");
        nodes.iter().collect::<Vec<_>>()
    } else {
        let threshold = degree_threshold(nodes.len(), settings);
        let direct = selected.and_then(|id| index.neighbors(id));

        let passed = nodes
            .iter()
            .filter(|node| {
                selected == Some(node.id.as_str())
                    || direct.is_some_and(|ids| ids.contains(&node.id))
                    || node
                        .importance
                        .is_some_and(|importance| importance > settings.importance_threshold)
                    || index.degree(&node.id) as f32 >= threshold
            })
            .collect::<Vec<_>>();
        debug!(
            nodes = nodes.len(),
            kept = passed.len(),
            degree_threshold = threshold,
            "filtered graph"
        );
        passed
    };

    let ids = passed
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();
    let edges = edges
        .iter()
        .filter(|edge| {
            ids.contains(resolve_endpoint_id(&edge.source))
                && ids.contains(resolve_endpoint_id(&edge.target))
        })
        .collect();

    VisibleSet {
        nodes: passed,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Category;

    fn star(leaves: usize) -> (Vec<Node>, Vec<Edge>) {
        let mut nodes = vec![Node::new("hub", Category::Model)];
        let mut edges = Vec::new();
        for leaf in 0..leaves {
            let id = format!("leaf-{leaf}");
            edges.push(Edge::new("hub", id.as_str()));
            nodes.push(Node::new(id, Category::Paper));
        }
        (nodes, edges)
    }

    fn slow_path() -> VisibilitySettings {
        VisibilitySettings {
            filter_threshold: 0,
            ..VisibilitySettings::default()
        }
    }

    #[test]
    fn threshold_grows_logarithmically() {
        let settings = VisibilitySettings::default();
        assert_eq!(degree_threshold(0, &settings), 2.0);
        assert_eq!(degree_threshold(1, &settings), 2.0);
        assert_eq!(degree_threshold(5, &settings), 2.0);
        let large = degree_threshold(1_000_000, &settings);
        assert!((large - (1_000_000f32).ln() / 2.0).abs() < 1e-4);
    }

    #[test]
    fn small_graph_passes_unchanged() {
        let (nodes, edges) = star(4);
        let index = ConnectivityIndex::build(&nodes, &edges);
        let visible = filter_visible(&nodes, &edges, &index, None, &VisibilitySettings::default());
        assert_eq!(visible.nodes.len(), nodes.len());
        assert_eq!(visible.edges.len(), edges.len());
    }

    #[test]
    fn degree_equal_to_threshold_passes() {
        let nodes = vec![
            Node::new("a", Category::Paper),
            Node::new("b", Category::Paper),
            Node::new("c", Category::Paper),
        ];
        let edges = vec![Edge::new("a", "b"), Edge::new("a", "c")];
        let index = ConnectivityIndex::build(&nodes, &edges);

        let visible = filter_visible(&nodes, &edges, &index, None, &slow_path());
        let ids = visible.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a"]);
        assert!(visible.edges.is_empty());
    }

    #[test]
    fn importance_must_exceed_threshold() {
        let nodes = vec![
            Node::new("equal", Category::Dataset).with_importance(0.7),
            Node::new("above", Category::Dataset).with_importance(0.71),
        ];
        let index = ConnectivityIndex::build(&nodes, &[]);
        let visible = filter_visible(&nodes, &[], &index, None, &slow_path());
        assert_eq!(visible.nodes.len(), 1);
        assert_eq!(visible.nodes[0].id, "above");
    }

    #[test]
    fn everything_can_be_filtered_out() {
        let nodes = vec![Node::new("x", Category::Author), Node::new("y", Category::Author)];
        let index = ConnectivityIndex::build(&nodes, &[]);
        let visible = filter_visible(&nodes, &[], &index, None, &slow_path());
        assert!(visible.is_empty());
    }

    #[test]
    fn selected_leaf_brings_in_hub_only() {
        let (nodes, edges) = star(3);
        let index = ConnectivityIndex::build(&nodes, &edges);
        let settings = VisibilitySettings {
            filter_threshold: 0,
            scale: crate::settings::ScaleSettings {
                degree_floor: 10.0,
                ..Default::default()
            },
            ..VisibilitySettings::default()
        };

        let visible = filter_visible(&nodes, &edges, &index, Some("leaf-1"), &settings);
        assert!(visible.contains("leaf-1"));
        assert!(visible.contains("hub"));
        assert!(!visible.contains("leaf-0"));
        assert_eq!(visible.edges.len(), 1);
    }
}
