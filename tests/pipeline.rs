use std::collections::HashSet;

use approx::assert_relative_eq;
use kg_lens::pipeline::{
    ConnectivityIndex, NodeRole, StyleMapper, degree_threshold, detail_level, filter_visible,
    resolve_endpoint_id,
};
use kg_lens::{Category, Edge, KnowledgeGraph, Node, VisibilitySettings, run_pipeline};

fn scenario_graph() -> KnowledgeGraph {
    KnowledgeGraph::new(
        ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(|id| Node::new(id, Category::Model))
            .collect(),
        vec![Edge::new("a", "b"), Edge::new("a", "c"), Edge::new("a", "d")],
    )
}

/// Deterministic pseudo-random graph: a few hubs, a long tail, some isolated nodes.
fn generated_graph(node_count: usize, seed: u64) -> KnowledgeGraph {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as usize
    };

    let nodes = (0..node_count)
        .map(|index| {
            let node = Node::new(format!("n{index}"), Category::Paper);
            if index % 17 == 0 {
                node.with_importance(0.95)
            } else {
                node
            }
        })
        .collect::<Vec<_>>();

    let mut edges = Vec::new();
    for index in 0..node_count {
        if index % 11 == 10 {
            continue;
        }
        let hub = next() % (node_count / 10).max(1);
        edges.push(Edge::new(format!("n{index}").as_str(), format!("n{hub}").as_str()));
        if next() % 3 == 0 {
            let other = next() % node_count;
            edges.push(Edge::new(format!("n{index}").as_str(), format!("n{other}").as_str()));
        }
    }

    KnowledgeGraph::new(nodes, edges)
}

fn ids<'a>(nodes: &[&'a Node]) -> Vec<&'a str> {
    nodes.iter().map(|node| node.id.as_str()).collect()
}

#[test]
fn five_node_scenario_keeps_selection_and_neighbors() {
    let graph = scenario_graph();
    let settings = VisibilitySettings {
        filter_threshold: 3,
        importance_threshold: 0.9,
        ..VisibilitySettings::default()
    };

    assert_relative_eq!(degree_threshold(graph.node_count(), &settings), 2.0);

    let output = run_pipeline(&graph, Some("a"), &settings, 1.0);
    assert_eq!(ids(&output.nodes), vec!["a", "b", "c", "d"]);
    assert_eq!(output.edges.len(), 3);
    assert_eq!(output.index.degree("a"), 3);
    assert_eq!(output.index.degree("e"), 0);
    assert!(output.style("e").is_none());
}

#[test]
fn selection_and_neighbors_survive_any_thresholds() {
    let graph = generated_graph(400, 7);
    let index = ConnectivityIndex::build(&graph.nodes, &graph.edges);

    for (filter_threshold, importance_threshold, floor) in
        [(0, 0.0, 2.0), (0, 5.0, 50.0), (100, 1.0, 1_000.0), (10_000, 0.5, 3.0)]
    {
        let mut settings = VisibilitySettings {
            filter_threshold,
            importance_threshold,
            ..VisibilitySettings::default()
        };
        settings.scale.degree_floor = floor;

        for selected in ["n0", "n3", "n10", "n399"] {
            let visible = filter_visible(&graph.nodes, &graph.edges, &index, Some(selected), &settings);
            let shown = visible
                .nodes
                .iter()
                .map(|node| node.id.as_str())
                .collect::<HashSet<_>>();

            assert!(shown.contains(selected));
            for neighbor in index.neighbors(selected).into_iter().flatten() {
                assert!(shown.contains(neighbor.as_str()), "{neighbor} missing for {selected}");
            }
        }
    }
}

#[test]
fn visible_edges_never_dangle() {
    let mut graph = generated_graph(300, 11);
    graph.edges.push(Edge::new("n1", "ghost"));
    let graph = KnowledgeGraph::new(graph.nodes, graph.edges);

    let settings = VisibilitySettings {
        filter_threshold: 0,
        ..VisibilitySettings::default()
    };

    for selected in [None, Some("n5"), Some("ghost")] {
        let output = run_pipeline(&graph, selected, &settings, 1.0);
        let shown = output
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();

        assert!(output.nodes.len() < graph.node_count());
        for edge in &output.edges {
            assert!(shown.contains(resolve_endpoint_id(&edge.source)));
            assert!(shown.contains(resolve_endpoint_id(&edge.target)));
        }
        for node in &output.nodes {
            assert!(graph.contains(&node.id));
            assert!(output.style(&node.id).is_some());
        }
    }
}

#[test]
fn fast_path_preserves_order() {
    let graph = generated_graph(60, 3);
    let settings = VisibilitySettings::default();

    let output = run_pipeline(&graph, Some("n4"), &settings, 0.5);
    let expected = graph
        .nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids(&output.nodes), expected);
    assert_eq!(output.edges.len(), graph.edge_count());
}

#[test]
fn radius_grows_with_degree() {
    let graph = generated_graph(250, 5);
    let settings = VisibilitySettings::default();
    let index = ConnectivityIndex::build(&graph.nodes, &graph.edges);
    let mapper = StyleMapper::new(&index, &settings);
    let selected = Some("n1");

    let mut plain = graph
        .nodes
        .iter()
        .filter(|node| node.importance.is_none())
        .filter(|node| node.id != "n1" && !index.is_neighbor("n1", &node.id))
        .map(|node| (index.degree(&node.id), mapper.style_for(node, selected, 1.7).radius))
        .collect::<Vec<_>>();
    plain.sort_by(|a, b| a.0.cmp(&b.0));

    assert!(plain.len() > 100);
    for pair in plain.windows(2) {
        assert!(pair[0].1 <= pair[1].1, "{:?} vs {:?}", pair[0], pair[1]);
    }
}

#[test]
fn doubling_zoom_shrinks_radius_by_root_two() {
    let graph = scenario_graph();
    let settings = VisibilitySettings::default();
    let index = ConnectivityIndex::build(&graph.nodes, &graph.edges);
    let mapper = StyleMapper::new(&index, &settings);

    for node in &graph.nodes {
        for selected in [None, Some("a"), Some("b")] {
            for zoom in [0.25_f32, 1.0, 3.0] {
                let near = mapper.style_for(node, selected, zoom);
                let far = mapper.style_for(node, selected, zoom * 2.0);
                assert_relative_eq!(
                    far.radius,
                    near.radius / std::f32::consts::SQRT_2,
                    max_relative = 1e-5
                );
            }
        }
    }
}

#[test]
fn label_tiers_follow_zoom() {
    let graph = scenario_graph();
    let settings = VisibilitySettings::default();

    let far = run_pipeline(&graph, Some("a"), &settings, 1.0).detail;
    assert!(!far.show_node_labels);
    assert!(!far.show_relationship_labels);
    assert!(far.node_label_visible("a", Some("a")));
    assert!(!far.node_label_visible("b", Some("a")));

    let mid = detail_level(1.5, &settings.detail);
    assert!(mid.show_node_labels);
    assert!(!mid.show_relationship_labels);

    let near = detail_level(3.0, &settings.detail);
    assert!(near.show_node_labels);
    assert!(near.show_relationship_labels);
}

#[test]
fn empty_graph_produces_empty_output() {
    let graph = KnowledgeGraph::default();
    for filter_threshold in [0, 100] {
        let settings = VisibilitySettings {
            filter_threshold,
            ..VisibilitySettings::default()
        };
        let output = run_pipeline(&graph, None, &settings, 0.0);
        assert!(output.nodes.is_empty());
        assert!(output.edges.is_empty());
        assert!(output.styles.is_empty());
        assert_eq!(output.index.max_degree(), 0);
    }
}

#[test]
fn sizing_uses_full_graph_max_degree() {
    let graph = scenario_graph();
    let settings = VisibilitySettings {
        filter_threshold: 0,
        ..VisibilitySettings::default()
    };

    let unselected = run_pipeline(&graph, None, &settings, 1.0);
    assert_eq!(ids(&unselected.nodes), vec!["a"]);
    let hub = unselected.style("a").map(|style| style.radius);
    assert_eq!(hub, Some(settings.node_size * settings.scale.radius_range_factor));

    let selected = run_pipeline(&graph, Some("e"), &settings, 1.0);
    let lonely = selected.style("e").map(|style| style.radius);
    assert_eq!(lonely, Some(settings.node_size * settings.scale.selected_radius_factor));
}

#[test]
fn filtering_starts_at_the_threshold() {
    let graph = scenario_graph();
    let count = graph.node_count();

    let at = VisibilitySettings {
        filter_threshold: count,
        ..VisibilitySettings::default()
    };
    let filtered = run_pipeline(&graph, None, &at, 1.0);
    assert_eq!(ids(&filtered.nodes), vec!["a"]);
    assert!(filtered.edges.is_empty());

    let above = VisibilitySettings {
        filter_threshold: count + 1,
        ..VisibilitySettings::default()
    };
    let unfiltered = run_pipeline(&graph, None, &above, 1.0);
    assert_eq!(ids(&unfiltered.nodes), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(unfiltered.edges.len(), graph.edge_count());
}

#[test]
fn selected_self_loop_is_styled_as_selection() {
    let mut edges = scenario_graph().edges;
    edges.push(Edge::new("e", "e"));
    let graph = KnowledgeGraph::new(scenario_graph().nodes, edges);
    let settings = VisibilitySettings {
        filter_threshold: 0,
        ..VisibilitySettings::default()
    };

    let unselected = run_pipeline(&graph, None, &settings, 1.0);
    assert_eq!(unselected.index.degree("e"), 2);
    assert_eq!(ids(&unselected.nodes), vec!["a", "e"]);
    assert_eq!(unselected.edges.len(), 1);

    let output = run_pipeline(&graph, Some("e"), &settings, 1.0);
    assert_eq!(NodeRole::of("e", Some("e"), &output.index), NodeRole::Selected);
    assert_eq!(ids(&output.nodes), vec!["a", "e"]);
    let radius = output.style("e").map(|style| style.radius);
    assert_eq!(radius, Some(settings.node_size * settings.scale.selected_radius_factor));
    let stroke = output.style("e").map(|style| style.stroke_width);
    assert_eq!(stroke, Some(settings.scale.selected_stroke_width));
}
