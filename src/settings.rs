use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Constants behind the degree threshold and the radius scale.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleSettings {
    pub degree_floor: f32,
    pub degree_log_divisor: f32,
    pub radius_range_factor: f32,
    pub selected_radius_factor: f32,
    pub neighbor_radius_factor: f32,
    pub selected_stroke_width: f32,
    pub neighbor_stroke_width: f32,
    pub default_stroke_width: f32,
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            degree_floor: 2.0,
            degree_log_divisor: 2.0,
            radius_range_factor: 2.5,
            selected_radius_factor: 2.0,
            neighbor_radius_factor: 1.5,
            selected_stroke_width: 3.0,
            neighbor_stroke_width: 2.0,
            default_stroke_width: 1.0,
        }
    }
}

/// Zoom scales at which labels start to appear.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetailThresholds {
    pub node_labels: f32,
    pub relationship_labels: f32,
}

impl Default for DetailThresholds {
    fn default() -> Self {
        Self {
            node_labels: 1.2,
            relationship_labels: 2.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisibilitySettings {
    /// Graphs with fewer nodes than this are shown unfiltered.
    pub filter_threshold: usize,
    /// Nodes whose importance exceeds this are always shown.
    pub importance_threshold: f32,
    pub node_size: f32,
    /// Only read by the layout simulation.
    pub force_strength: f32,
    pub scale: ScaleSettings,
    pub detail: DetailThresholds,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            filter_threshold: 100,
            importance_threshold: 0.7,
            node_size: 8.0,
            force_strength: 1.0,
            scale: ScaleSettings::default(),
            detail: DetailThresholds::default(),
        }
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl VisibilitySettings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&raw).map_err(|source| GraphError::Parse {
            context: path.display().to_string(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.node_size) {
            return Err(GraphError::InvalidSettings(format!(
                "nodeSize must be positive, got {}",
                self.node_size
            )));
        }

        if !is_positive(self.scale.degree_log_divisor) {
            return Err(GraphError::InvalidSettings(
                "scale.degreeLogDivisor must be positive".to_owned(),
            ));
        }

        if self.scale.radius_range_factor < 1.0 {
            return Err(GraphError::InvalidSettings(
                "scale.radiusRangeFactor must be at least 1".to_owned(),
            ));
        }

        let detail = self.detail;
        if !is_positive(detail.node_labels) || !is_positive(detail.relationship_labels) {
            return Err(GraphError::InvalidSettings(
                "detail thresholds must be positive".to_owned(),
            ));
        }
        if detail.node_labels > detail.relationship_labels {
            return Err(GraphError::InvalidSettings(format!(
                "detail.nodeLabels ({}) is above detail.relationshipLabels ({})",
                detail.node_labels, detail.relationship_labels
            )));
        }

        Ok(())
    }
}
