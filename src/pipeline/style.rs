use std::collections::HashMap;

use crate::graph::Node;
use crate::settings::VisibilitySettings;

use super::index::ConnectivityIndex;

/// Smallest zoom scale the mapper will divide by.
pub const MIN_ZOOM: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    Selected,
    Neighbor,
    Other,
}

impl NodeRole {
    pub fn of(id: &str, selected: Option<&str>, index: &ConnectivityIndex) -> Self {
        match selected {
            Some(selected) if selected == id => Self::Selected,
            Some(selected) if index.is_neighbor(selected, id) => Self::Neighbor,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub radius: f32,
    pub stroke_width: f32,
    /// Unmultiplied RGBA.
    pub stroke_color: [u8; 4],
}

/// Clamped logarithmic scale; a collapsed domain maps to the middle of the range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl LogScale {
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        let min = domain.0.max(f32::MIN_POSITIVE);
        let max = domain.1.max(min);
        Self {
            domain: (min, max),
            range,
        }
    }

    fn normalize(&self, value: f32) -> f32 {
        let (min, max) = self.domain;
        let denominator = max.ln() - min.ln();
        if denominator.abs() < f32::EPSILON {
            return 0.5;
        }

        let value = value.max(f32::MIN_POSITIVE);
        ((value.ln() - min.ln()) / denominator).clamp(0.0, 1.0)
    }

    pub fn scale(&self, value: f32) -> f32 {
        let (low, high) = self.range;
        low + (high - low) * self.normalize(value)
    }
}

fn stroke_color(role: NodeRole) -> [u8; 4] {
    match role {
        NodeRole::Selected => [245, 206, 93, 255],
        NodeRole::Neighbor => [241, 146, 94, 210],
        NodeRole::Other => [15, 15, 15, 150],
    }
}

pub fn zoom_compensation(zoom: f32) -> f32 {
    let zoom = if zoom.is_finite() { zoom.max(MIN_ZOOM) } else { 1.0 };
    zoom.sqrt()
}

pub struct StyleMapper<'a> {
    index: &'a ConnectivityIndex,
    settings: &'a VisibilitySettings,
    scale: LogScale,
}

impl<'a> StyleMapper<'a> {
    pub fn new(index: &'a ConnectivityIndex, settings: &'a VisibilitySettings) -> Self {
        let max_degree = index.max_degree().max(1) as f32;
        let node_size = settings.node_size;
        let scale = LogScale::new(
            (1.0, max_degree),
            (node_size, node_size * settings.scale.radius_range_factor),
        );

        Self {
            index,
            settings,
            scale,
        }
    }

    pub fn base_radius(&self, node: &Node, role: NodeRole) -> f32 {
        let node_size = self.settings.node_size;
        let scale = self.settings.scale;
        let radius = match role {
            NodeRole::Selected => node_size * scale.selected_radius_factor,
            NodeRole::Neighbor => node_size * scale.neighbor_radius_factor,
            NodeRole::Other => self.scale.scale(self.index.degree(&node.id).max(1) as f32),
        };

        match node.importance {
            Some(importance) => radius * (0.8 + importance * 0.4).max(0.0),
            None => radius,
        }
    }

    pub fn style_for(&self, node: &Node, selected: Option<&str>, zoom: f32) -> NodeStyle {
        let role = NodeRole::of(&node.id, selected, self.index);
        let compensation = zoom_compensation(zoom);
        let scale = self.settings.scale;
        let stroke_width = match role {
            NodeRole::Selected => scale.selected_stroke_width,
            NodeRole::Neighbor => scale.neighbor_stroke_width,
            NodeRole::Other => scale.default_stroke_width,
        };

        NodeStyle {
            radius: self.base_radius(node, role) / compensation,
            stroke_width: stroke_width / compensation,
            stroke_color: stroke_color(role),
        }
    }

    pub fn map_styles(
        &self,
        nodes: &[&Node],
        selected: Option<&str>,
        zoom: f32,
    ) -> HashMap<String, NodeStyle> {
        nodes
            .iter()
            .map(|node| (node.id.clone(), self.style_for(node, selected, zoom)))
            .collect()
    }
}
