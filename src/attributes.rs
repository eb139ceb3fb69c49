//! Scalar surface attributes from an aligned plane and its bins.
//!
//! - Width: per bin holding at least `min_count` values, the span between
//!   the trimmed low/high cross-axis values; the feature width is the mean
//!   over qualifying bins.
//! - Running/cross slope: inclination of the running/cross axis against the
//!   horizontal, in degrees, as a non-negative magnitude.
use crate::angle::slope_angle_deg;
use crate::binning::ProjectedPointBins;
use crate::error::{EstimationError, Result};
use crate::params::WidthParams;
use crate::plane::Plane;
use crate::types::BinWidth;
use log::debug;

/// Trimmed width of every bin that meets the count threshold. Bins below the
/// threshold are omitted, not zero-filled.
pub fn width_by_bin(bins: &ProjectedPointBins, params: &WidthParams) -> Vec<BinWidth> {
    bins.populated(params.min_count)
        .filter_map(|(_, bin)| {
            let sorted = bin.sorted_values();
            let (lo, hi) = params.trim.indices(sorted.len())?;
            Some(BinWidth {
                width: (sorted[hi] - sorted[lo]).abs(),
                count: sorted.len(),
            })
        })
        .collect()
}

/// Mean of the qualifying per-bin widths.
pub fn mean_width(widths: &[BinWidth], params: &WidthParams) -> Result<f32> {
    if widths.is_empty() {
        return Err(EstimationError::NoQualifyingBins {
            min_count: params.min_count,
        });
    }
    let sum: f64 = widths.iter().map(|w| w.width as f64).sum();
    Ok((sum / widths.len() as f64) as f32)
}

/// Feature width from the bins of an aligned plane.
pub fn estimate_width(bins: &ProjectedPointBins, params: &WidthParams) -> Result<f32> {
    let widths = width_by_bin(bins, params);
    let width = mean_width(&widths, params)?;
    debug!(
        "width: {:.3} m from {} of {} bins",
        width,
        widths.len(),
        bins.bin_count
    );
    Ok(width)
}

/// Slope along the direction of travel, in degrees.
pub fn running_slope(aligned: &Plane) -> f32 {
    slope_angle_deg(&aligned.first)
}

/// Slope across the direction of travel, in degrees.
pub fn cross_slope(aligned: &Plane) -> f32 {
    slope_angle_deg(&aligned.second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::ProjectedPointBin;
    use nalgebra::Vector3;

    fn bin_with(n: usize, spread: f32) -> ProjectedPointBin {
        let values = (0..n)
            .map(|i| spread * (i as f32 / (n - 1).max(1) as f32 - 0.5))
            .collect();
        ProjectedPointBin::new((0.0, 0.25), values)
    }

    #[test]
    fn bins_below_min_count_are_excluded() {
        let bins = ProjectedPointBins::from_bins(vec![bin_with(99, 1.0)]);
        let params = WidthParams::default();
        assert!(width_by_bin(&bins, &params).is_empty());
        assert_eq!(
            estimate_width(&bins, &params),
            Err(EstimationError::NoQualifyingBins { min_count: 100 })
        );
    }

    #[test]
    fn trimmed_width_discards_outliers() {
        let mut bin = bin_with(100, 1.0);
        bin.values[0] = -50.0;
        bin.values[99] = 50.0;
        let bins = ProjectedPointBins::from_bins(vec![bin, bin_with(50, 3.0), bin_with(200, 2.0)]);
        let widths = width_by_bin(&bins, &WidthParams::default());
        assert_eq!(widths.len(), 2);
        assert!(widths.iter().all(|w| w.width >= 0.0));
        assert_eq!(widths[0].count, 100);
        // indices 5 and 95 of 100 evenly spaced values over [-0.5, 0.5]
        assert!((widths[0].width - 90.0 / 99.0).abs() < 1e-5);
        let mean = mean_width(&widths, &WidthParams::default()).unwrap();
        assert!((mean - 0.5 * (widths[0].width + widths[1].width)).abs() < 1e-6);
    }

    #[test]
    fn slopes_are_non_negative_degrees() {
        let rise = 5.0f32.to_radians().tan();
        let first = Vector3::new(0.0, -rise, -1.0).normalize();
        let normal = Vector3::new(0.0, 1.0, -rise).normalize();
        let second = normal.cross(&first).normalize();
        let plane = Plane::from_axes(Vector3::zeros(), normal, first, second);
        assert!((running_slope(&plane) - 5.0).abs() < 1e-3);
        assert!(cross_slope(&plane).abs() < 1e-3);
    }
}
