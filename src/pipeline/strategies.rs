//! Ordered fallback chains.
//!
//! Every attribute and every geometry kind has a list of strategies tried in
//! order. The first success wins; recoverable failures are recorded and the
//! next strategy runs. Fatal failures (cancellation, missing configuration)
//! abort the chain and the request.
use super::cancel::CancellationToken;
use crate::error::{ErrorKind, EstimationError, Result};
use log::warn;
use serde::{Deserialize, Serialize};

pub trait Strategy: Copy {
    fn label(&self) -> &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthStrategy {
    /// Mean trimmed width of the running-axis bins.
    PlaneBins,
    /// Mean of the trapezoid's top and bottom edge lengths.
    Trapezoid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeStrategy {
    /// Inclination of the aligned plane axis.
    PlaneAxes,
    /// Inclination between trapezoid corner offsets.
    Trapezoid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStrategy {
    /// Near and far ends of the plane's populated bins.
    PlaneEndpoints,
    /// Bottom-edge and top-edge centres of the trapezoid bound.
    Trapezoid,
    /// Leftmost, rightmost and midway contour points.
    PolygonExtremes,
    /// Depth around the contour centroid.
    Centroid,
}

impl Strategy for WidthStrategy {
    fn label(&self) -> &'static str {
        match self {
            WidthStrategy::PlaneBins => "plane_bins",
            WidthStrategy::Trapezoid => "trapezoid",
        }
    }
}

impl Strategy for SlopeStrategy {
    fn label(&self) -> &'static str {
        match self {
            SlopeStrategy::PlaneAxes => "plane_axes",
            SlopeStrategy::Trapezoid => "trapezoid",
        }
    }
}

impl Strategy for LocationStrategy {
    fn label(&self) -> &'static str {
        match self {
            LocationStrategy::PlaneEndpoints => "plane_endpoints",
            LocationStrategy::Trapezoid => "trapezoid",
            LocationStrategy::PolygonExtremes => "polygon_extremes",
            LocationStrategy::Centroid => "centroid",
        }
    }
}

/// One strategy that did not produce a value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub kind: ErrorKind,
    pub message: String,
}

impl StrategyFailure {
    pub fn new(strategy: &'static str, err: &EstimationError) -> Self {
        Self {
            strategy,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChainOutcome<S, T> {
    /// Winning strategy and its value.
    pub value: Option<(S, T)>,
    pub failures: Vec<StrategyFailure>,
    /// Error of the last strategy tried, kept for callers that surface it.
    pub last_error: Option<EstimationError>,
}

impl<S, T> ChainOutcome<S, T> {
    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }
}

/// Runs `chain` in order, checking `token` before each attempt.
pub fn run_chain<S, T, F>(
    what: &str,
    chain: &[S],
    token: &CancellationToken,
    mut attempt: F,
) -> Result<ChainOutcome<S, T>>
where
    S: Strategy,
    F: FnMut(S) -> Result<T>,
{
    let mut failures = Vec::new();
    let mut last_error = None;
    for &strategy in chain {
        token.check()?;
        match attempt(strategy) {
            Ok(value) => {
                return Ok(ChainOutcome {
                    value: Some((strategy, value)),
                    failures,
                    last_error: None,
                })
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!("{what}: strategy {} failed: {err}", strategy.label());
                failures.push(StrategyFailure::new(strategy.label(), &err));
                last_error = Some(err);
            }
        }
    }
    if chain.is_empty() {
        last_error = Some(EstimationError::ConfigurationMissing("strategy chain"));
    }
    Ok(ChainOutcome {
        value: None,
        failures,
        last_error,
    })
}
