use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use kg_lens::pipeline::NodeRole;

use crate::util::truncate_label;

use super::super::render_utils::{
    blend_color, category_color, dim_color, draw_background, edge_visible, stroke_color,
    world_to_screen,
};
use super::super::{PhysicsConfig, RenderGraph, SearchMatchCache, ViewModel};

const LABEL_MAX_CHARS: usize = 32;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    fn update_screen_space(rect: egui::Rect, pan: egui::Vec2, zoom: f32, cache: &mut RenderGraph) {
        let scratch = &mut cache.view_scratch;
        scratch.screen_positions.clear();
        scratch.screen_radii.clear();
        for node in &cache.nodes {
            scratch
                .screen_positions
                .push(world_to_screen(rect, pan, zoom, node.world_pos));
            scratch.screen_radii.push(node.style.radius * zoom);
        }
    }

    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.graph_revision == self.render_graph_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let cache = self.graph_cache.as_ref()?;
        let matcher = SkimMatcherV2::default();
        let matches = cache
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                fuzzy_match_score(&matcher, &node.label, query).is_some()
                    || fuzzy_match_score(&matcher, &node.id, query).is_some()
            })
            .map(|(index, _)| index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            graph_revision: self.render_graph_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let zoom_changed = self
            .graph_cache
            .as_ref()
            .is_some_and(|cache| cache.styled_zoom != self.zoom);
        if self.graph_dirty || zoom_changed {
            self.rebuild_render_graph();
        }

        let search_matches = self.cached_search_matches();
        let pan = self.pan;
        let zoom = self.zoom;
        let physics = PhysicsConfig {
            strength: self.settings.force_strength,
            delta_seconds: ui
                .ctx()
                .input(|input| input.stable_dt)
                .clamp(1.0 / 240.0, 1.0 / 20.0),
        };

        let Some(cache) = self.graph_cache.as_mut() else {
            ui.label("No graph loaded.");
            return;
        };
        if cache.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No nodes pass the current filters. Lower the importance threshold or select a node.",
                FontId::proportional(14.0),
                Color32::from_gray(200),
            );
            return;
        }

        if self.live_physics && super::super::physics::step_physics(cache, physics) {
            ui.ctx().request_repaint();
        }
        if response.dragged() {
            ui.ctx().request_repaint();
        }

        Self::update_screen_space(rect, pan, zoom, cache);
        Self::visible_indices_into(
            rect,
            &cache.view_scratch.screen_positions,
            &cache.view_scratch.screen_radii,
            &mut cache.view_scratch.visible_indices,
        );

        let hovered = Self::hovered_index(
            ui,
            &cache.view_scratch.visible_indices,
            &cache.view_scratch.screen_positions,
            &cache.view_scratch.screen_radii,
        );
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let pending_selection = response
            .clicked_by(egui::PointerButton::Primary)
            .then(|| hovered.map(|index| cache.nodes[index].id.clone()));

        let selection_active = self.selected.is_some();
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());
        let detail = cache.detail;
        let zoom_sqrt = zoom.sqrt();

        let positions = &cache.view_scratch.screen_positions;
        for edge in &cache.edges {
            let start = positions[edge.source];
            let end = positions[edge.target];
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }

            let source_role = cache.nodes[edge.source].role;
            let target_role = cache.nodes[edge.target].role;
            let touches_selection =
                source_role == NodeRole::Selected || target_role == NodeRole::Selected;

            let (width, color) = if touches_selection {
                ((2.2 * zoom_sqrt).clamp(1.2, 4.4), Color32::from_rgb(241, 146, 94))
            } else if selection_active {
                (
                    (0.8 * zoom_sqrt).clamp(0.45, 2.0),
                    Color32::from_rgba_unmultiplied(80, 90, 104, 130),
                )
            } else {
                (
                    (1.1 * zoom_sqrt).clamp(0.6, 3.0),
                    Color32::from_rgba_unmultiplied(90, 96, 108, 190),
                )
            };
            painter.line_segment([start, end], Stroke::new(width, color));

            if detail.show_relationship_labels {
                painter.text(
                    start + (end - start) * 0.5,
                    Align2::CENTER_CENTER,
                    edge.relationship.as_str(),
                    FontId::proportional(10.0),
                    Color32::from_gray(170),
                );
            }
        }

        let selected_id = self.selected.as_deref();
        for &index in &cache.view_scratch.visible_indices {
            let node = &cache.nodes[index];
            let position = positions[index];
            let radius = cache.view_scratch.screen_radii[index];
            let is_hovered = hovered == Some(index);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base = category_color(node.category);
            let fill = if is_hovered {
                blend_color(base, Color32::WHITE, 0.35)
            } else if node.role != NodeRole::Other {
                base
            } else if is_match {
                blend_color(base, Color32::from_rgb(103, 196, 255), 0.68)
            } else if selection_active {
                dim_color(base, 0.52)
            } else if search_active {
                dim_color(base, 0.38)
            } else {
                base
            };

            painter.circle_filled(position, radius, fill);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(node.style.stroke_width * zoom, stroke_color(node.style.stroke_color)),
            );

            if detail.node_label_visible(&node.id, selected_id) {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    truncate_label(&node.label, LABEL_MAX_CHARS),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(index) = hovered {
            let node = &cache.nodes[index];
            let hover_text = self
                .graph
                .node(&node.id)
                .map(|source| format!("{}  |  {}", source.display_name(), source.category.label()))
                .unwrap_or_else(|| node.id.clone());
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                hover_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(selected) = pending_selection {
            self.set_selected(selected);
        }
    }
}
