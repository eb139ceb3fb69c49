//! Parameters of the estimator as a whole.
use super::strategies::{LocationStrategy, SlopeStrategy, WidthStrategy};
use crate::feature::FeatureGeometry;
use crate::params::{
    AlignmentParams, BinningParams, DepthRange, EndpointParams, ParallelOptions, WidthParams,
};
use serde::{Deserialize, Serialize};

/// Fallback chains per attribute, tried in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeChains {
    pub width: Vec<WidthStrategy>,
    pub running_slope: Vec<SlopeStrategy>,
    pub cross_slope: Vec<SlopeStrategy>,
}

impl Default for AttributeChains {
    fn default() -> Self {
        Self {
            width: vec![WidthStrategy::PlaneBins, WidthStrategy::Trapezoid],
            running_slope: vec![SlopeStrategy::PlaneAxes, SlopeStrategy::Trapezoid],
            cross_slope: vec![SlopeStrategy::PlaneAxes, SlopeStrategy::Trapezoid],
        }
    }
}

/// Fallback chains per feature geometry, tried in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationChains {
    pub point: Vec<LocationStrategy>,
    pub line_string: Vec<LocationStrategy>,
    pub polygon: Vec<LocationStrategy>,
}

impl Default for LocationChains {
    fn default() -> Self {
        Self {
            point: vec![LocationStrategy::Centroid],
            line_string: vec![
                LocationStrategy::PlaneEndpoints,
                LocationStrategy::Trapezoid,
                LocationStrategy::Centroid,
            ],
            polygon: vec![LocationStrategy::PolygonExtremes, LocationStrategy::Centroid],
        }
    }
}

impl LocationChains {
    pub fn for_geometry(&self, geometry: FeatureGeometry) -> &[LocationStrategy] {
        match geometry {
            FeatureGeometry::Point => &self.point,
            FeatureGeometry::LineString => &self.line_string,
            FeatureGeometry::Polygon => &self.polygon,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorParams {
    pub depth: DepthRange,
    pub alignment: AlignmentParams,
    pub binning: BinningParams,
    pub width: WidthParams,
    pub endpoints: EndpointParams,
    pub parallel: ParallelOptions,
    /// Window radius (pixels) for the centroid depth sample.
    pub centroid_radius_px: usize,
    /// Window radius (pixels) for trapezoid and polygon point samples.
    pub point_radius_px: usize,
    /// Compute the image-space plane overlay for the report.
    pub project_plane: bool,
    pub attribute_chains: AttributeChains,
    pub location_chains: LocationChains,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            depth: DepthRange::default(),
            alignment: AlignmentParams::default(),
            binning: BinningParams::default(),
            width: WidthParams::default(),
            endpoints: EndpointParams::default(),
            parallel: ParallelOptions::default(),
            centroid_radius_px: 3,
            point_radius_px: 0,
            project_plane: true,
            attribute_chains: AttributeChains::default(),
            location_chains: LocationChains::default(),
        }
    }
}
