//! Running-axis selection.
//!
//! PCA axes carry no notion of travel direction. The axis whose horizontal
//! direction best matches the camera's horizontal view direction becomes the
//! running axis. When neither axis is travel-aligned, the horizontal view
//! direction projected onto the plane is used instead, and when that
//! projection is degenerate (view direction along the normal) the largest
//! variance axis is kept. The cross axis is always `normalize(normal ×
//! running)`, which keeps the frame right-handed.
use super::Plane;
use crate::angle::{horizontal_alignment, horizontal_direction, normalize_checked};
use crate::camera::CameraPose;
use crate::error::{EstimationError, Result};
use crate::params::AlignmentParams;
use log::debug;
use nalgebra::Vector3;
use serde::Serialize;

/// Which candidate became the running axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunningAxisChoice {
    First,
    Second,
    ViewProjection,
    /// The view projection was degenerate, `first` was kept.
    DegenerateFallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AlignedPlane {
    pub plane: Plane,
    pub choice: RunningAxisChoice,
    pub first_score: f32,
    pub second_score: f32,
}

/// Horizontal view direction projected onto the plane, normalized. Fails
/// when the projection is shorter than `min_len`.
pub fn view_direction_on_plane(
    plane: &Plane,
    view: &Vector3<f32>,
    min_len: f32,
) -> Result<Vector3<f32>> {
    let horizontal = horizontal_direction(view).ok_or(EstimationError::DegenerateViewDirection)?;
    let on_plane = horizontal - plane.normal * horizontal.dot(&plane.normal);
    normalize_checked(&on_plane, min_len).ok_or(EstimationError::DegenerateViewDirection)
}

pub fn align_plane(plane: &Plane, pose: &CameraPose, params: &AlignmentParams) -> AlignedPlane {
    let view = pose.view_direction();
    let first_score = horizontal_alignment(&plane.first, &view);
    let second_score = horizontal_alignment(&plane.second, &view);

    let (running, choice) = if first_score < params.threshold && second_score < params.threshold {
        match view_direction_on_plane(plane, &view, params.degenerate_length) {
            Ok(v) => (v, RunningAxisChoice::ViewProjection),
            Err(e) => {
                debug!("align: {e}, keeping first axis");
                (plane.first, RunningAxisChoice::DegenerateFallback)
            }
        }
    } else if first_score >= second_score {
        (plane.first, RunningAxisChoice::First)
    } else {
        (plane.second, RunningAxisChoice::Second)
    };

    let running = running.normalize();
    let cross = plane.normal.cross(&running).normalize();
    debug!(
        "align: choice={:?} scores=({:.3}, {:.3})",
        choice, first_score, second_score
    );

    AlignedPlane {
        plane: Plane {
            origin: plane.origin,
            normal: plane.normal,
            first: running,
            second: cross,
            d: plane.d,
        },
        choice,
        first_score,
        second_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UP;

    fn ground() -> Plane {
        Plane::from_axes(
            Vector3::zeros(),
            UP,
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
        )
    }

    fn pose_looking(dir: Vector3<f32>) -> CameraPose {
        let eye = Vector3::new(0.0, 1.5, 0.0);
        CameraPose::look_at(eye, eye + dir).unwrap()
    }

    #[test]
    fn picks_axis_along_view() {
        let pose = pose_looking(Vector3::new(0.1, -0.8, -1.0));
        let aligned = align_plane(&ground(), &pose, &AlignmentParams::default());
        assert_eq!(aligned.choice, RunningAxisChoice::Second);
        assert!((aligned.plane.first.z.abs() - 1.0).abs() < 1e-5);
        assert!(aligned.plane.is_orthonormal(1e-5));
        let handed = aligned.plane.first.cross(&aligned.plane.second);
        assert!((handed - aligned.plane.normal).norm() < 1e-5);
    }

    #[test]
    fn diagonal_view_projects_onto_plane() {
        let pose = pose_looking(Vector3::new(1.0, -0.5, -1.0));
        let params = AlignmentParams {
            threshold: 0.9,
            ..AlignmentParams::default()
        };
        let aligned = align_plane(&ground(), &pose, &params);
        assert_eq!(aligned.choice, RunningAxisChoice::ViewProjection);
        let expected = Vector3::new(1.0, 0.0, -1.0).normalize();
        assert!((aligned.plane.first - expected).norm() < 1e-5);
    }

    #[test]
    fn view_along_normal_keeps_first_axis() {
        // wall facing the camera: normal is horizontal and parallel to the view
        let wall = Plane::from_axes(
            Vector3::new(0.0, 1.0, -2.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
        );
        let pose = pose_looking(Vector3::new(0.0, 0.0, -1.0));
        let aligned = align_plane(&wall, &pose, &AlignmentParams::default());
        assert_eq!(aligned.choice, RunningAxisChoice::DegenerateFallback);
        assert_eq!(aligned.plane.first, wall.first);
    }

    #[test]
    fn realignment_is_stable() {
        let pose = pose_looking(Vector3::new(0.3, -1.0, -1.0));
        let params = AlignmentParams::default();
        let once = align_plane(&ground(), &pose, &params).plane;
        let twice = align_plane(&once, &pose, &params).plane;
        assert!((once.first - twice.first).norm() < 1e-5);
        assert!((once.second.dot(&twice.second).abs() - 1.0).abs() < 1e-5);
    }
}
