//! Tunables for the individual estimation stages.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON config only
//! needs to name the fields it overrides. The defaults are the values the
//! estimators were calibrated with; change them only with field data to back
//! the new value.
use serde::{Deserialize, Serialize};

/// Accepted depth interval in metres. Zero always means "no measurement".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthRange {
    pub min_m: f32,
    pub max_m: f32,
}

impl Default for DepthRange {
    fn default() -> Self {
        Self {
            min_m: 0.1,
            max_m: 5.0,
        }
    }
}

impl DepthRange {
    pub fn new(min_m: f32, max_m: f32) -> Self {
        Self { min_m, max_m }
    }

    /// True when `depth` is a usable measurement.
    #[inline]
    pub fn contains(&self, depth: f32) -> bool {
        depth != 0.0 && depth.is_finite() && depth >= self.min_m && depth <= self.max_m
    }
}

/// Running-axis selection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParams {
    /// Minimum horizontal alignment score for a PCA axis to count as
    /// travel-aligned.
    pub threshold: f32,
    /// Projected view directions shorter than this are treated as degenerate.
    pub degenerate_length: f32,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            degenerate_length: 1e-3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinningParams {
    /// Bin width along the running axis, in metres.
    pub bin_size: f32,
}

impl Default for BinningParams {
    fn default() -> Self {
        Self { bin_size: 0.25 }
    }
}

/// Percentile trimming applied to the cross-axis values of a bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimParams {
    pub low: f32,
    pub high: f32,
}

impl Default for TrimParams {
    fn default() -> Self {
        Self {
            low: 0.05,
            high: 0.95,
        }
    }
}

impl TrimParams {
    /// Indices of the low/high trimmed values in a sorted run of `count`
    /// values, clamped to the valid range. `None` for an empty run.
    pub fn indices(&self, count: usize) -> Option<(usize, usize)> {
        if count == 0 {
            return None;
        }
        let last = count - 1;
        let lo = ((count as f32 * self.low).floor().max(0.0) as usize).min(last);
        let hi = ((count as f32 * self.high).floor().max(0.0) as usize).min(last);
        Some((lo, hi))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidthParams {
    /// Bins with fewer values are left out of the width average.
    pub min_count: usize,
    pub trim: TrimParams,
}

impl Default for WidthParams {
    fn default() -> Self {
        Self {
            min_count: 100,
            trim: TrimParams::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointParams {
    /// Minimum number of values for a bin to count as populated.
    pub min_count: usize,
    pub trim: TrimParams,
}

impl Default for EndpointParams {
    fn default() -> Self {
        Self {
            min_count: 1,
            trim: TrimParams::default(),
        }
    }
}

/// Controls whether data-parallel stages run sequentially or with Rayon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelOptions {
    enabled: bool,
    min_items_for_parallel: usize,
}

impl ParallelOptions {
    pub fn new(enabled: bool, min_items_for_parallel: usize) -> Self {
        Self {
            enabled,
            min_items_for_parallel: min_items_for_parallel.max(1),
        }
    }

    /// Sequential execution regardless of workload size.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_items_for_parallel: usize::MAX,
        }
    }

    /// Returns true when a workload of `items` should be split across threads.
    pub fn should_parallelize(&self, items: usize) -> bool {
        cfg!(feature = "parallel") && self.enabled && items >= self.min_items_for_parallel
    }

    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items_for_parallel = min_items.max(1);
        self
    }
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_items_for_parallel: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_range_rejects_zero_and_out_of_range() {
        let r = DepthRange::default();
        assert!(!r.contains(0.0));
        assert!(!r.contains(0.05));
        assert!(!r.contains(f32::NAN));
        assert!(!r.contains(5.5));
        assert!(r.contains(0.1));
        assert!(r.contains(5.0));
    }

    #[test]
    fn trim_indices_follow_floor_convention() {
        let t = TrimParams::default();
        assert_eq!(t.indices(100), Some((5, 95)));
        assert_eq!(t.indices(150), Some((7, 142)));
        assert_eq!(t.indices(1), Some((0, 0)));
        assert_eq!(t.indices(0), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let w: WidthParams = serde_json::from_str(r#"{ "min_count": 20 }"#).unwrap();
        assert_eq!(w.min_count, 20);
        assert_eq!(w.trim, TrimParams::default());
    }

    #[test]
    fn disabled_parallel_never_splits() {
        assert!(!ParallelOptions::disabled().should_parallelize(usize::MAX));
    }
}
