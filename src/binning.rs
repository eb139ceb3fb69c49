//! Fixed-width binning of plane-local points along the running axis.
//!
//! For points spanning `[s_min, s_max]` and bin width `w` there are exactly
//! `ceil((s_max - s_min) / w)` bins. Point `p` lands in bin
//! `floor((p.s - s_min) / w)` clamped to the last bin, so `s_max` itself is
//! kept. Empty bins stay in place so a bin index always maps to the same `s`
//! interval. A cloud with zero extent along `s` produces no bins.
//!
//! The parallel path folds points into per-thread bin buffers and merges them
//! afterwards; the order of values inside a bin is unspecified.
use crate::error::{EstimationError, Result};
use crate::params::ParallelOptions;
use crate::types::ProjectedPoint;
use log::debug;
use serde::Serialize;

/// Cross-axis values of every point whose `s` fell in `s_range`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProjectedPointBin {
    pub value_count: usize,
    pub values: Vec<f32>,
    /// `[min, max)`; the last bin also holds `s_max`.
    pub s_range: (f32, f32),
}

impl ProjectedPointBin {
    pub fn new(s_range: (f32, f32), values: Vec<f32>) -> Self {
        Self {
            value_count: values.len(),
            values,
            s_range,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value_count == 0
    }

    /// Midpoint of the bin's `s` interval.
    #[inline]
    pub fn s_center(&self) -> f32 {
        0.5 * (self.s_range.0 + self.s_range.1)
    }

    /// Values sorted ascending (the bin itself is left untouched).
    pub fn sorted_values(&self) -> Vec<f32> {
        let mut v = self.values.clone();
        v.sort_by(f32::total_cmp);
        v
    }
}

/// Complete binning result, bins ordered by increasing `s`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProjectedPointBins {
    pub bin_count: usize,
    pub bins: Vec<ProjectedPointBin>,
}

impl ProjectedPointBins {
    pub fn from_bins(bins: Vec<ProjectedPointBin>) -> Self {
        Self {
            bin_count: bins.len(),
            bins,
        }
    }

    /// Bins holding at least `min_count` values, with their indices.
    pub fn populated(&self, min_count: usize) -> impl Iterator<Item = (usize, &ProjectedPointBin)> {
        let min_count = min_count.max(1);
        self.bins
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.value_count >= min_count)
    }

    pub fn total_values(&self) -> usize {
        self.bins.iter().map(|b| b.value_count).sum()
    }
}

/// Geometry shared by every point of one binning call.
#[derive(Clone, Copy, Debug)]
struct BinLayout {
    s_min: f32,
    bin_size: f32,
    count: usize,
}

impl BinLayout {
    #[inline]
    fn index(&self, s: f32) -> usize {
        let raw = ((s - self.s_min) / self.bin_size).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.count - 1)
        }
    }

    #[inline]
    fn bound(&self, i: usize) -> f32 {
        self.s_min + i as f32 * self.bin_size
    }

    fn range(&self, i: usize) -> (f32, f32) {
        (self.bound(i), self.bound(i + 1))
    }
}

/// Upper bound on the number of bins one call may allocate.
pub const MAX_BINS: usize = 1 << 20;

pub fn bin_projected_points(
    points: &[ProjectedPoint],
    bin_size: f32,
    parallel: ParallelOptions,
) -> Result<ProjectedPointBins> {
    if !(bin_size.is_finite() && bin_size > 0.0) {
        return Err(EstimationError::InvalidParameter {
            name: "bin_size",
            value: bin_size,
        });
    }

    let (s_min, s_max) = points
        .iter()
        .filter(|p| p.s.is_finite() && p.t.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.s), hi.max(p.s))
        });
    if s_min > s_max {
        return Ok(ProjectedPointBins::default());
    }

    let count = (f64::from(s_max) - f64::from(s_min)) / f64::from(bin_size);
    let count = count.ceil();
    if !count.is_finite() || count > MAX_BINS as f64 {
        return Err(EstimationError::InvalidParameter {
            name: "bin_size",
            value: bin_size,
        });
    }
    let count = count as usize;
    if count == 0 {
        debug!("binning: {} points with zero extent along s", points.len());
        return Ok(ProjectedPointBins::default());
    }
    let layout = BinLayout {
        s_min,
        bin_size,
        count,
    };

    let values = if parallel.should_parallelize(points.len()) {
        #[cfg(feature = "parallel")]
        {
            fill_parallel(points, layout)
        }
        #[cfg(not(feature = "parallel"))]
        {
            fill_sequential(points, layout)
        }
    } else {
        fill_sequential(points, layout)
    };

    let bins: Vec<ProjectedPointBin> = values
        .into_iter()
        .enumerate()
        .map(|(i, v)| ProjectedPointBin::new(layout.range(i), v))
        .collect();
    let result = ProjectedPointBins::from_bins(bins);
    debug!(
        "binning: points={} s=[{:.3}, {:.3}] bins={} populated={}",
        result.total_values(),
        s_min,
        s_max,
        result.bin_count,
        result.populated(1).count()
    );
    Ok(result)
}

#[inline]
fn accumulate(acc: &mut [Vec<f32>], p: &ProjectedPoint, layout: BinLayout) {
    if p.s.is_finite() && p.t.is_finite() {
        acc[layout.index(p.s)].push(p.t);
    }
}

fn fill_sequential(points: &[ProjectedPoint], layout: BinLayout) -> Vec<Vec<f32>> {
    let mut acc = vec![Vec::new(); layout.count];
    for p in points {
        accumulate(&mut acc, p, layout);
    }
    acc
}

#[cfg(feature = "parallel")]
fn fill_parallel(points: &[ProjectedPoint], layout: BinLayout) -> Vec<Vec<f32>> {
    use rayon::prelude::*;

    points
        .par_iter()
        .fold(
            || vec![Vec::new(); layout.count],
            |mut acc, p| {
                accumulate(&mut acc, p, layout);
                acc
            },
        )
        .reduce(
            || vec![Vec::new(); layout.count],
            |mut a, b| {
                for (dst, src) in a.iter_mut().zip(b) {
                    dst.extend(src);
                }
                a
            },
        )
}
