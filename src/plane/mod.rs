//! Planar model of a surface patch and the stages that operate on it.
//!
//! Overview
//! - [`fit::fit_plane_pca`] estimates a plane from a world point cloud.
//! - [`align::align_plane`] reorders the in-plane axes so `first` follows
//!   the direction of travel (running axis) and `second` crosses it.
//! - [`project`] maps world points into plane-local `(s, t)` coordinates and
//!   draws the plane axes into the camera image for overlays.
//!
//! A [`Plane`] always carries a right-handed orthonormal frame
//! `first × second = normal`, with `d = -normal·origin`.
pub mod align;
pub mod fit;
pub mod project;

pub use align::{align_plane, AlignedPlane, RunningAxisChoice};
pub use fit::fit_plane_pca;
pub use project::{project_plane_to_image, project_point, project_points, ProjectedPlane};

use crate::types::{ProjectedPoint, WorldPoint};
use nalgebra::Vector3;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Plane {
    pub origin: WorldPoint,
    pub normal: Vector3<f32>,
    /// Running axis once aligned; largest-variance axis straight after a fit.
    pub first: Vector3<f32>,
    /// Cross axis once aligned; middle-variance axis straight after a fit.
    pub second: Vector3<f32>,
    pub d: f32,
}

impl Plane {
    /// Builds a plane from its origin and axes, deriving `d`.
    pub fn from_axes(
        origin: WorldPoint,
        normal: Vector3<f32>,
        first: Vector3<f32>,
        second: Vector3<f32>,
    ) -> Self {
        Self {
            origin,
            normal,
            first,
            second,
            d: -normal.dot(&origin),
        }
    }

    /// Signed distance of `p` from the plane along the normal.
    #[inline]
    pub fn signed_distance(&self, p: &WorldPoint) -> f32 {
        self.normal.dot(p) + self.d
    }

    /// Inverse of [`project_point`]: the world point at plane-local `(s, t)`.
    #[inline]
    pub fn unproject(&self, p: ProjectedPoint) -> WorldPoint {
        self.origin + self.first * p.s + self.second * p.t
    }

    /// True when the three axes are unit length and mutually orthogonal
    /// within `tol`.
    pub fn is_orthonormal(&self, tol: f32) -> bool {
        let unit = |v: &Vector3<f32>| (v.norm() - 1.0).abs() <= tol;
        unit(&self.first)
            && unit(&self.second)
            && unit(&self.normal)
            && self.first.dot(&self.second).abs() <= tol
            && self.first.dot(&self.normal).abs() <= tol
            && self.second.dot(&self.normal).abs() <= tol
    }
}
