//! Error type shared by every estimation stage.
//!
//! Stages never substitute defaults for a failed computation; they return an
//! [`EstimationError`] and let the orchestration layer decide whether a
//! fallback strategy applies. [`EstimationError::kind`] groups the variants
//! into the coarse categories callers branch on.

use serde::Serialize;
use thiserror::Error;

/// Coarse failure category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientInput,
    NumericalDegeneracy,
    InvalidGeometry,
    ConfigurationMissing,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum EstimationError {
    #[error("insufficient points for plane fit ({found} < {minimum})")]
    InsufficientPoints { found: usize, minimum: usize },
    #[error("no populated bins to resolve endpoints from")]
    NoPopulatedBins,
    #[error("no bin reached the minimum count of {min_count} points")]
    NoQualifyingBins { min_count: usize },
    #[error("eigen-decomposition of the covariance matrix did not converge")]
    EigenDecompositionFailed,
    #[error("point set is degenerate (eigenvalues {eigenvalues:?})")]
    DegeneratePointSet { eigenvalues: [f32; 3] },
    #[error("view direction is nearly parallel to the plane normal")]
    DegenerateViewDirection,
    #[error("camera pose is not invertible")]
    SingularPose,
    #[error("camera intrinsics are not invertible")]
    SingularIntrinsics,
    #[error("point lies behind the camera")]
    PointBehindCamera,
    #[error("projected line does not cross the image bounds")]
    ProjectionOutsideImage,
    #[error("invalid bounds: expected {expected} points, got {found}")]
    InvalidBounds { expected: usize, found: usize },
    #[error("feature has no polygon points")]
    EmptyPolygon,
    #[error("no valid depth sample at ({x:.1}, {y:.1})")]
    MissingDepth { x: f32, y: f32 },
    #[error("buffer holds {found} values, expected {expected}")]
    BufferSizeMismatch { expected: usize, found: usize },
    #[error("map dimensions differ: depth {depth:?} vs labels {labels:?}")]
    DimensionMismatch {
        depth: (usize, usize),
        labels: (usize, usize),
    },
    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f32 },
    #[error("required component not configured: {0}")]
    ConfigurationMissing(&'static str),
    #[error("estimation request was cancelled")]
    Cancelled,
    #[error("estimation request exceeded its deadline")]
    DeadlineExceeded,
}

impl EstimationError {
    pub fn kind(&self) -> ErrorKind {
        use EstimationError::*;
        match self {
            InsufficientPoints { .. } | NoPopulatedBins | NoQualifyingBins { .. } => {
                ErrorKind::InsufficientInput
            }
            EigenDecompositionFailed
            | DegeneratePointSet { .. }
            | DegenerateViewDirection
            | SingularPose
            | SingularIntrinsics => ErrorKind::NumericalDegeneracy,
            PointBehindCamera
            | ProjectionOutsideImage
            | InvalidBounds { .. }
            | EmptyPolygon
            | MissingDepth { .. }
            | BufferSizeMismatch { .. }
            | DimensionMismatch { .. } => ErrorKind::InvalidGeometry,
            ConfigurationMissing(_) | InvalidParameter { .. } => ErrorKind::ConfigurationMissing,
            Cancelled | DeadlineExceeded => ErrorKind::Cancelled,
        }
    }

    /// True for failures that end the whole request instead of one strategy.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Cancelled | ErrorKind::ConfigurationMissing
        )
    }
}

pub type Result<T> = std::result::Result<T, EstimationError>;
