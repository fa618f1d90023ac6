use eframe::egui::{self, Ui};
use kg_lens::pipeline::degree_threshold;

use crate::util::truncate_label;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (name or id)")
            .on_hover_text("Fuzzy-highlight matching nodes among those currently shown.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();

        let mut changed = false;
        let max_filter_threshold = self.graph.node_count().max(10) + 1;
        changed |= ui
            .add(
                egui::Slider::new(&mut self.settings.filter_threshold, 0..=max_filter_threshold)
                    .text("Filter threshold")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Graphs with fewer nodes than this are shown unfiltered.")
            .changed();

        changed |= ui
            .add(
                egui::Slider::new(&mut self.settings.importance_threshold, 0.0..=1.0)
                    .text("Importance threshold"),
            )
            .on_hover_text("Nodes scoring above this are always shown.")
            .changed();

        changed |= ui
            .add(
                egui::Slider::new(&mut self.settings.node_size, 2.0..=24.0)
                    .text("Node size")
                    .clamping(egui::SliderClamping::Always),
            )
            .changed();

        ui.add(
            egui::Slider::new(&mut self.settings.force_strength, 0.0..=4.0)
                .text("Force strength")
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text("Scales layout forces. Zero freezes the layout.");

        ui.checkbox(&mut self.live_physics, "Live layout simulation");

        if self.graph.node_count() >= self.settings.filter_threshold {
            ui.small(format!(
                "Filtering active: nodes need degree >= {:.2}",
                degree_threshold(self.graph.node_count(), &self.settings)
            ));
        } else {
            ui.small("Filtering inactive for this graph size.");
        }

        egui::CollapsingHeader::new("Level of detail")
            .default_open(false)
            .show(ui, |ui| {
                let detail = &mut self.settings.detail;
                changed |= ui
                    .add(
                        egui::Slider::new(&mut detail.node_labels, 0.1..=8.0)
                            .text("Node labels from zoom"),
                    )
                    .changed();
                changed |= ui
                    .add(
                        egui::Slider::new(&mut detail.relationship_labels, 0.1..=8.0)
                            .text("Relationship labels from zoom"),
                    )
                    .changed();
                if detail.relationship_labels < detail.node_labels {
                    detail.relationship_labels = detail.node_labels;
                }
            });

        if changed {
            self.graph_dirty = true;
        }

        ui.separator();
        self.draw_ranking(ui);
    }

    fn draw_ranking(&mut self, ui: &mut Ui) {
        ui.label(egui::RichText::new("Most connected").strong());

        let row_count = self.top_connected.len().min(self.ranking_rows_visible);
        let mut should_load_more = false;
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .id_salt("degree_ranking_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 20.0, row_count, |ui, row_range| {
                if row_range.end + Self::RANKING_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for index in row_range {
                    let Some((id, degree)) = self.top_connected.get(index) else {
                        continue;
                    };
                    let name = self
                        .graph
                        .node(id)
                        .map(|node| node.display_name())
                        .unwrap_or(id.as_str());
                    let is_selected = self.selected.as_deref() == Some(id.as_str());
                    let text = format!("{}  ({degree})", truncate_label(name, 36));
                    if ui.selectable_label(is_selected, text).clicked() {
                        clicked = Some(id.clone());
                    }
                }
            });

        if should_load_more && self.ranking_rows_visible < self.top_connected.len() {
            self.ranking_rows_visible =
                (self.ranking_rows_visible + Self::RANKING_PAGE_ROWS).min(self.top_connected.len());
        }

        if let Some(id) = clicked {
            self.set_selected(Some(id));
        }
    }
}
