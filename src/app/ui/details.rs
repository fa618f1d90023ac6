use eframe::egui::{self, RichText, Ui};

use crate::util::truncate_label;

use super::super::ViewModel;

struct NeighborEntry {
    id: String,
    name: String,
    relationship: String,
    outgoing: bool,
    in_view: bool,
}

impl ViewModel {
    fn neighbor_entries(&self, selected_id: &str) -> Vec<NeighborEntry> {
        let mut entries = self
            .graph
            .incident_edges(selected_id)
            .map(|(edge, other)| NeighborEntry {
                id: other.to_owned(),
                name: self
                    .graph
                    .node(other)
                    .map(|node| node.display_name().to_owned())
                    .unwrap_or_else(|| format!("{other} (missing)")),
                relationship: edge.relationship.clone(),
                outgoing: edge.source.id() == selected_id,
                in_view: self
                    .graph_cache
                    .as_ref()
                    .is_some_and(|cache| cache.index_by_id.contains_key(other)),
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.relationship.cmp(&b.relationship)));
        entries
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a node from the graph or the ranking.");
            return;
        };

        if !self.graph.contains(&selected_id) {
            ui.label("Selected node is not part of the loaded graph.");
            if ui.button("Clear selection").clicked() {
                self.set_selected(None);
            }
            return;
        }
        let Some(node) = self.graph.node(&selected_id) else {
            return;
        };

        ui.label(RichText::new(node.display_name()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Category: {}", node.category.label()));
        match node.importance {
            Some(importance) => ui.label(format!("Importance: {importance:.2}")),
            None => ui.label("Importance: not set"),
        };
        if let Some(year) = node.year {
            ui.label(format!("Year: {year}"));
        }

        ui.label(format!(
            "Connections: {}",
            self.connectivity.degree(&selected_id)
        ));

        if let Some(cache) = &self.graph_cache
            && let Some(&index) = cache.index_by_id.get(&selected_id)
        {
            let style = cache.nodes[index].style;
            ui.label(format!(
                "Radius: {:.1}  stroke: {:.1}",
                style.radius, style.stroke_width
            ));
        }

        ui.separator();
        ui.label(RichText::new("Direct connections").strong());

        let neighbors = self.neighbor_entries(&selected_id);
        if neighbors.is_empty() {
            ui.label("This node has no connections.");
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("neighbor_scroll")
            .max_height(360.0)
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, neighbors.len(), |ui, row_range| {
                for entry in &neighbors[row_range] {
                    let arrow = if entry.outgoing { "->" } else { "<-" };
                    let view_flag = if entry.in_view { "" } else { "  [hidden]" };
                    let label = format!(
                        "{arrow} {}  ({}){view_flag}",
                        truncate_label(&entry.name, 36),
                        entry.relationship
                    );
                    if ui.link(label).on_hover_text(entry.id.as_str()).clicked() {
                        clicked = Some(entry.id.clone());
                    }
                }
            });

        ui.add_space(6.0);
        if ui.button("Clear selection").clicked() {
            self.set_selected(None);
        } else if let Some(id) = clicked {
            self.set_selected(Some(id));
        }
    }
}
