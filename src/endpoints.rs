//! Line-string endpoints of a feature along its running axis.
//!
//! The first and last populated bins stand for the two ends of the feature.
//! Each end is placed at the centre of its bin's `s` interval and at the
//! midpoint of the trimmed cross-axis values, then lifted back to 3D on the
//! aligned plane. The end nearer to the camera (horizontal distance) comes
//! first, since depth at the far end is noisier.
use crate::binning::{ProjectedPointBin, ProjectedPointBins};
use crate::camera::CameraPose;
use crate::error::{EstimationError, Result};
use crate::localization::delta_from_world_point;
use crate::params::{EndpointParams, TrimParams};
use crate::plane::Plane;
use crate::types::{ProjectedPoint, WorldPoint};
use log::debug;

/// Representative plane-local point of a bin.
fn bin_anchor(bin: &ProjectedPointBin, trim: &TrimParams) -> Option<ProjectedPoint> {
    let sorted = bin.sorted_values();
    let (lo, hi) = trim.indices(sorted.len())?;
    Some(ProjectedPoint::new(
        bin.s_center(),
        0.5 * (sorted[lo] + sorted[hi]),
    ))
}

pub fn resolve_endpoints(
    bins: &ProjectedPointBins,
    aligned: &Plane,
    pose: &CameraPose,
    params: &EndpointParams,
) -> Result<[WorldPoint; 2]> {
    let mut populated = bins.populated(params.min_count);
    let (first_idx, first) = populated.next().ok_or(EstimationError::NoPopulatedBins)?;
    let (last_idx, last) = populated.last().unwrap_or((first_idx, first));

    let near = bin_anchor(first, &params.trim).ok_or(EstimationError::NoPopulatedBins)?;
    let far = bin_anchor(last, &params.trim).ok_or(EstimationError::NoPopulatedBins)?;

    let mut ends = [aligned.unproject(near), aligned.unproject(far)];
    let dist = |p: &WorldPoint| delta_from_world_point(p, pose).magnitude();
    if dist(&ends[1]) < dist(&ends[0]) {
        ends.swap(0, 1);
    }
    debug!(
        "endpoints: bins {}..{} of {} -> distances {:.2} m, {:.2} m",
        first_idx,
        last_idx,
        bins.bin_count,
        dist(&ends[0]),
        dist(&ends[1])
    );
    Ok(ends)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UP;
    use nalgebra::Vector3;

    fn ground_plane() -> Plane {
        // running axis points away from the camera (north)
        Plane::from_axes(
            Vector3::new(0.0, 0.0, -1.0),
            UP,
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(-1.0, 0.0, 0.0),
        )
    }

    fn bins(layout: &[(usize, f32)], n_bins: usize) -> ProjectedPointBins {
        let bins = (0..n_bins)
            .map(|i| {
                let range = (i as f32 * 0.25, (i + 1) as f32 * 0.25);
                let values = layout
                    .iter()
                    .find(|(k, _)| *k == i)
                    .map(|&(_, t)| vec![t - 0.1, t, t + 0.1])
                    .unwrap_or_default();
                ProjectedPointBin::new(range, values)
            })
            .collect();
        ProjectedPointBins::from_bins(bins)
    }

    #[test]
    fn no_populated_bins_fails() {
        let pose = CameraPose::look_at(Vector3::new(0.0, 1.5, 0.0), Vector3::new(0.0, 0.0, -2.0))
            .unwrap();
        let empty = bins(&[], 5);
        assert_eq!(
            resolve_endpoints(&empty, &ground_plane(), &pose, &EndpointParams::default()),
            Err(EstimationError::NoPopulatedBins)
        );
    }

    #[test]
    fn near_end_comes_first() {
        let b = bins(&[(0, 0.2), (9, -0.3)], 10);
        let plane = ground_plane();
        // camera beyond the far end looking back
        let pose = CameraPose::look_at(Vector3::new(0.0, 1.5, -5.0), Vector3::new(0.0, 0.0, -2.0))
            .unwrap();
        let [a, b_end] = resolve_endpoints(&b, &plane, &pose, &EndpointParams::default()).unwrap();
        let expected_far_bin = plane.unproject(ProjectedPoint::new(2.375, -0.3));
        let expected_near_bin = plane.unproject(ProjectedPoint::new(0.125, 0.2));
        assert!((a - expected_far_bin).norm() < 1e-5);
        assert!((b_end - expected_near_bin).norm() < 1e-5);
    }

    #[test]
    fn single_bin_yields_coincident_ends() {
        let pose = CameraPose::look_at(Vector3::new(0.0, 1.5, 0.0), Vector3::new(0.0, 0.0, -2.0))
            .unwrap();
        let b = bins(&[(2, 0.0)], 4);
        let [a, c] = resolve_endpoints(&b, &ground_plane(), &pose, &EndpointParams::default()).unwrap();
        assert_eq!(a, c);
    }
}
