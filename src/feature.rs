//! Feature descriptors handed in by the contour detector, and the attribute
//! values written back onto them.
//!
//! All image points are normalized (origin bottom-left, y up).
use crate::pipeline::LocationEstimate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureGeometry {
    Point,
    LineString,
    Polygon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Width,
    RunningSlope,
    CrossSlope,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 3] = [
        AttributeKind::Width,
        AttributeKind::RunningSlope,
        AttributeKind::CrossSlope,
    ];
}

/// Estimated attribute values; `None` when estimation failed or was not
/// requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureAttributes {
    /// Metres.
    pub width: Option<f32>,
    /// Degrees.
    pub running_slope: Option<f32>,
    /// Degrees.
    pub cross_slope: Option<f32>,
}

impl FeatureAttributes {
    pub fn get(&self, kind: AttributeKind) -> Option<f32> {
        match kind {
            AttributeKind::Width => self.width,
            AttributeKind::RunningSlope => self.running_slope,
            AttributeKind::CrossSlope => self.cross_slope,
        }
    }

    pub fn set(&mut self, kind: AttributeKind, value: Option<f32>) {
        match kind {
            AttributeKind::Width => self.width = value,
            AttributeKind::RunningSlope => self.running_slope = value,
            AttributeKind::CrossSlope => self.cross_slope = value,
        }
    }
}

fn all_attributes() -> Vec<AttributeKind> {
    AttributeKind::ALL.to_vec()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityFeature {
    /// Class id of the feature in the label map.
    pub class_label: u8,
    pub geometry: FeatureGeometry,
    pub centroid: [f32; 2],
    /// Contour points.
    #[serde(default)]
    pub polygon: Vec<[f32; 2]>,
    /// Bottom-left, top-left, top-right, bottom-right.
    #[serde(default)]
    pub trapezoid: Option<[[f32; 2]; 4]>,
    #[serde(default = "all_attributes")]
    pub requested: Vec<AttributeKind>,
    #[serde(default)]
    pub attributes: FeatureAttributes,
    #[serde(default)]
    pub location: Option<LocationEstimate>,
}

impl AccessibilityFeature {
    pub fn new(class_label: u8, geometry: FeatureGeometry, centroid: [f32; 2]) -> Self {
        Self {
            class_label,
            geometry,
            centroid,
            polygon: Vec::new(),
            trapezoid: None,
            requested: all_attributes(),
            attributes: FeatureAttributes::default(),
            location: None,
        }
    }

    pub fn with_polygon(mut self, polygon: Vec<[f32; 2]>) -> Self {
        self.polygon = polygon;
        self
    }

    pub fn with_trapezoid(mut self, trapezoid: [[f32; 2]; 4]) -> Self {
        self.trapezoid = Some(trapezoid);
        self
    }

    pub fn with_requested(mut self, requested: Vec<AttributeKind>) -> Self {
        self.requested = requested;
        self
    }

    /// Leftmost and rightmost contour points.
    pub fn polygon_extremes(&self) -> Option<([f32; 2], [f32; 2])> {
        let left = self
            .polygon
            .iter()
            .copied()
            .min_by(|a, b| a[0].total_cmp(&b[0]))?;
        let right = self
            .polygon
            .iter()
            .copied()
            .max_by(|a, b| a[0].total_cmp(&b[0]))?;
        Some((left, right))
    }
}
