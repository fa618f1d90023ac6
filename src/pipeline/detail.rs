use crate::settings::DetailThresholds;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetailLevel {
    pub show_node_labels: bool,
    pub show_relationship_labels: bool,
}

impl DetailLevel {
    /// The selected node keeps its label at every zoom level.
    pub fn node_label_visible(&self, id: &str, selected: Option<&str>) -> bool {
        self.show_node_labels || selected == Some(id)
    }
}

pub fn detail_level(zoom: f32, thresholds: &DetailThresholds) -> DetailLevel {
    DetailLevel {
        show_node_labels: zoom >= thresholds.node_labels,
        show_relationship_labels: zoom >= thresholds.relationship_labels,
    }
}
