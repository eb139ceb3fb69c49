//! Estimation pipeline orchestrating the geometric stages per request.
//!
//! [`AttributeEstimator`] runs extraction → fit → align → project → bin once
//! per request and feeds the result to the attribute and location strategy
//! chains. The cancellation token is checked between stages and between
//! strategies, never inside a stage.
//!
//! Typical usage:
//! ```no_run
//! use attribute_estimator::pipeline::{AttributeEstimator, CancellationToken, EstimatorParams};
//! use attribute_estimator::{AccessibilityFeature, CaptureContext, FeatureGeometry, GeoCoordinate};
//! use std::sync::Arc;
//!
//! # fn example(capture: CaptureContext) {
//! let mut estimator = AttributeEstimator::new(EstimatorParams::default());
//! estimator.configure(Arc::new(capture));
//! let mut feature = AccessibilityFeature::new(2, FeatureGeometry::LineString, [0.5, 0.3]);
//! let fix = GeoCoordinate::new(47.65, -122.30);
//! let token = CancellationToken::new();
//! if let Ok(report) = estimator.estimate(&mut feature, Some(fix), &token) {
//!     println!("{}", report.summary());
//! }
//! # }
//! ```
pub mod cancel;
pub mod estimator;
pub mod params;
pub mod strategies;

pub use cancel::CancellationToken;
pub use estimator::AttributeEstimator;
pub use params::{AttributeChains, EstimatorParams, LocationChains};
pub use strategies::{
    run_chain, ChainOutcome, LocationStrategy, SlopeStrategy, Strategy, StrategyFailure,
    WidthStrategy,
};

use crate::binning::ProjectedPointBins;
use crate::diagnostics::TimingBreakdown;
use crate::plane::{AlignedPlane, Plane, ProjectedPlane};
use crate::types::{GeoCoordinate, LocationDelta};
use serde::{Deserialize, Serialize};

/// Plane stages of one request, shared by every strategy that needs them.
#[derive(Clone, Debug)]
pub struct PlaneAnalysis {
    pub class_label: u8,
    pub points_extracted: usize,
    pub fitted: Plane,
    pub aligned: AlignedPlane,
    pub bins: ProjectedPointBins,
    pub projected: Option<ProjectedPlane>,
    pub timings: TimingBreakdown,
}

/// Geolocation of a feature relative to a device fix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationEstimate {
    pub strategy: LocationStrategy,
    /// One ring/line per geometry part; a point feature has a single entry.
    pub coordinates: Vec<Vec<GeoCoordinate>>,
    /// Mean offset of the sampled points from the device.
    pub delta: LocationDelta,
    /// Mean sampled depth (or camera distance for world points), metres.
    pub depth: f32,
}
