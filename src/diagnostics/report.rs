use super::TimingBreakdown;
use crate::feature::{AttributeKind, FeatureGeometry};
use crate::pipeline::strategies::StrategyFailure;
use crate::pipeline::{LocationEstimate, PlaneAnalysis};
use crate::plane::{AlignedPlane, Plane, ProjectedPlane};
use crate::types::BinWidth;
use serde::Serialize;
use std::fmt::Write as _;

/// Everything an estimation request did, for tools and offline debugging.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationReport {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plane: Option<PlaneStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plane_failure: Option<StrategyFailure>,
    pub attributes: Vec<AttributeOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationOutcome>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub class_label: u8,
    pub geometry: FeatureGeometry,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneStage {
    pub points_extracted: usize,
    pub fitted: Plane,
    pub aligned: AlignedPlane,
    pub bin_count: usize,
    pub populated_bins: usize,
    pub bin_widths: Vec<BinWidth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected: Option<ProjectedPlane>,
}

impl PlaneStage {
    pub fn from_analysis(analysis: &PlaneAnalysis, bin_widths: Vec<BinWidth>) -> Self {
        Self {
            points_extracted: analysis.points_extracted,
            fitted: analysis.fitted,
            aligned: analysis.aligned,
            bin_count: analysis.bins.bin_count,
            populated_bins: analysis.bins.populated(1).count(),
            bin_widths,
            projected: analysis.projected.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOutcome {
    pub attribute: AttributeKind,
    pub value: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StrategyFailure>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOutcome {
    pub estimate: Option<LocationEstimate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StrategyFailure>,
}

fn format_optional(val: Option<f32>) -> String {
    val.map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "-".to_string())
}

impl EstimationReport {
    pub fn attribute(&self, kind: AttributeKind) -> Option<&AttributeOutcome> {
        self.attributes.iter().find(|a| a.attribute == kind)
    }

    /// Human-readable multi-line summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Estimation summary");
        let _ = writeln!(
            out,
            "  input: {}x{} class={} geometry={:?}",
            self.input.width, self.input.height, self.input.class_label, self.input.geometry
        );
        match (&self.plane, &self.plane_failure) {
            (Some(p), _) => {
                let n = p.aligned.plane.normal;
                let _ = writeln!(
                    out,
                    "  plane: points={} normal=({:.3}, {:.3}, {:.3}) axis={:?} bins={} populated={}",
                    p.points_extracted, n.x, n.y, n.z, p.aligned.choice, p.bin_count, p.populated_bins
                );
            }
            (None, Some(f)) => {
                let _ = writeln!(out, "  plane: failed ({})", f.message);
            }
            (None, None) => {
                let _ = writeln!(out, "  plane: not run");
            }
        }
        for a in &self.attributes {
            let _ = writeln!(
                out,
                "  {:?}: {} via {}",
                a.attribute,
                format_optional(a.value),
                a.strategy.unwrap_or("-")
            );
            for f in &a.failures {
                let _ = writeln!(out, "    {} failed: {}", f.strategy, f.message);
            }
        }
        if let Some(loc) = &self.location {
            match &loc.estimate {
                Some(est) => {
                    let _ = writeln!(
                        out,
                        "  location: {:?} points={} depth={:.3} delta=({:.3}, {:.3})",
                        est.strategy,
                        est.coordinates.iter().map(Vec::len).sum::<usize>(),
                        est.depth,
                        est.delta.east,
                        est.delta.north
                    );
                }
                None => {
                    let _ = writeln!(out, "  location: failed");
                }
            }
            for f in &loc.failures {
                let _ = writeln!(out, "    {} failed: {}", f.strategy, f.message);
            }
        }
        let _ = writeln!(out, "  total_ms: {:.3}", self.timings.total_ms);
        out
    }
}
