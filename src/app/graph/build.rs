use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use kg_lens::pipeline::{NodeRole, resolve_endpoint_id, run_pipeline};
use tracing::debug;

use crate::util::stable_pair;

use super::super::{PhysicsScratch, RenderEdge, RenderGraph, RenderNode, ViewModel, ViewScratch};

const SPAWN_JITTER: f32 = 36.0;

fn spawn_position(id: &str, index: usize, anchor: Option<Vec2>, count: usize) -> Vec2 {
    let (jx, jy) = stable_pair(id);
    match anchor {
        Some(anchor) => anchor + vec2(jx, jy) * SPAWN_JITTER,
        None => {
            let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
            let ring = (count as f32).sqrt() * 28.0;
            vec2(angle.cos(), angle.sin()) * ring + vec2(jx, jy) * SPAWN_JITTER
        }
    }
}

impl ViewModel {
    /// Runs the view pipeline and rebuilds the render graph, carrying over the
    /// positions of nodes that were already on screen.
    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        self.render_graph_revision = self.render_graph_revision.wrapping_add(1);
        self.search_match_cache = None;

        let output = run_pipeline(
            &self.graph,
            self.selected.as_deref(),
            &self.settings,
            self.zoom,
        );
        let selected = self.selected.as_deref();

        let mut prior = self
            .graph_cache
            .take()
            .map(|cache| {
                cache
                    .nodes
                    .into_iter()
                    .map(|node| (node.id.clone(), node))
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();
        let reused = output
            .nodes
            .iter()
            .filter(|node| prior.contains_key(&node.id))
            .count();

        let mut nodes: Vec<RenderNode> = Vec::with_capacity(output.nodes.len());
        let mut index_by_id: HashMap<String, usize> = HashMap::with_capacity(output.nodes.len());
        for (index, node) in output.nodes.iter().enumerate() {
            let Some(style) = output.style(&node.id).copied() else {
                continue;
            };
            let role = NodeRole::of(&node.id, selected, &output.index);

            let render_node = match prior.remove(&node.id) {
                Some(mut existing) => {
                    existing.role = role;
                    existing.style = style;
                    existing
                }
                None => {
                    let anchor = output.index.neighbors(&node.id).and_then(|neighbors| {
                        neighbors
                            .iter()
                            .find_map(|id| index_by_id.get(id).map(|&at| nodes[at].world_pos))
                    });
                    RenderNode {
                        id: node.id.clone(),
                        label: node.display_name().to_owned(),
                        category: node.category,
                        world_pos: spawn_position(&node.id, index, anchor, output.nodes.len()),
                        velocity: Vec2::ZERO,
                        role,
                        style,
                    }
                }
            };

            index_by_id.insert(render_node.id.clone(), nodes.len());
            nodes.push(render_node);
        }

        let edges = output
            .edges
            .iter()
            .filter_map(|edge| {
                let source = *index_by_id.get(resolve_endpoint_id(&edge.source))?;
                let target = *index_by_id.get(resolve_endpoint_id(&edge.target))?;
                Some(RenderEdge {
                    source,
                    target,
                    relationship: edge.relationship.clone(),
                })
            })
            .collect::<Vec<_>>();

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            reused,
            "rebuilt render graph"
        );

        self.graph_cache = Some(RenderGraph {
            hidden_node_count: self.graph.node_count().saturating_sub(nodes.len()),
            physics_scratch: PhysicsScratch {
                positions: Vec::with_capacity(nodes.len()),
                forces: Vec::with_capacity(nodes.len()),
            },
            nodes,
            edges,
            index_by_id,
            detail: output.detail,
            styled_zoom: self.zoom,
            view_scratch: ViewScratch {
                screen_positions: Vec::new(),
                screen_radii: Vec::new(),
                visible_indices: Vec::new(),
            },
        });
        self.graph_dirty = false;
    }
}
