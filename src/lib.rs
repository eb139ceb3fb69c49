#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod capture;
pub mod diagnostics;
pub mod error;
pub mod feature;
pub mod image;
pub mod pipeline;
pub mod types;

// Stage modules: usable on their own, the estimator composes them.
pub mod angle;
pub mod attributes;
pub mod binning;
pub mod camera;
pub mod endpoints;
pub mod extract;
pub mod localization;
pub mod params;
pub mod plane;

// Tooling and host integration.
pub mod config;
pub mod ffi;

// --- High-level re-exports -------------------------------------------------

// Main entry points: estimator, its inputs and results.
pub use crate::capture::CaptureContext;
pub use crate::error::{ErrorKind, EstimationError, Result};
pub use crate::feature::{AccessibilityFeature, AttributeKind, FeatureAttributes, FeatureGeometry};
pub use crate::pipeline::{AttributeEstimator, CancellationToken, EstimatorParams, LocationEstimate};
pub use crate::types::{GeoCoordinate, LocationDelta, ProjectedPoint, WorldPoint};

// Camera model shared by every stage.
pub use crate::camera::{CameraIntrinsics, CameraPose, ImageSize};

// Report returned by the estimator.
pub use crate::diagnostics::EstimationReport;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use attribute_estimator::prelude::*;
/// use nalgebra::Vector3;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), EstimationError> {
/// let (w, h) = (160usize, 120usize);
/// let depth = DepthMap::new(w, h);
/// let labels = LabelMap::new(w, h, 0);
/// let pose = CameraPose::look_at(Vector3::new(0.0, 1.5, 0.0), Vector3::new(0.0, 0.0, -4.0))?;
/// let k = CameraIntrinsics::from_params(120.0, 120.0, 80.0, 60.0)?;
/// let capture = CaptureContext::new(depth, labels, pose, k)?;
///
/// let est = AttributeEstimator::with_capture(EstimatorParams::default(), Arc::new(capture));
/// let mut feature = AccessibilityFeature::new(1, FeatureGeometry::LineString, [0.5, 0.3]);
/// let report = est.estimate(&mut feature, None, &CancellationToken::new())?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{DepthMap, LabelMap};
    pub use crate::{
        AccessibilityFeature, AttributeEstimator, CameraIntrinsics, CameraPose,
        CancellationToken, CaptureContext, EstimationError, EstimatorParams, FeatureGeometry,
        GeoCoordinate,
    };
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    // Stage runners.
    pub use crate::attributes::{cross_slope, estimate_width, mean_width, running_slope, width_by_bin};
    pub use crate::binning::{bin_projected_points, ProjectedPointBin, ProjectedPointBins};
    pub use crate::endpoints::resolve_endpoints;
    pub use crate::extract::extract_world_points;
    pub use crate::localization::{
        delta_from_point, delta_from_world_point, location_from_delta, location_from_point,
        location_from_world_point, trapezoid_cross_slope, trapezoid_running_slope,
        trapezoid_width, PointWithDepth,
    };
    pub use crate::plane::{
        align_plane, fit_plane_pca, project_plane_to_image, project_point, project_points,
        AlignedPlane, Plane, ProjectedPlane, RunningAxisChoice,
    };

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        AttributeOutcome, InputDescriptor, LocationOutcome, PlaneStage, StageTiming,
        TimingBreakdown,
    };
    pub use crate::pipeline::{PlaneAnalysis, StrategyFailure};
}
