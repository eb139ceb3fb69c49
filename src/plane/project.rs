//! World → plane-local projection and plane → image overlay geometry.
use super::Plane;
use crate::camera::{project_world_to_pixel, CameraIntrinsics, CameraPose, ImageSize};
use crate::error::{EstimationError, Result};
use crate::types::{ProjectedPoint, WorldPoint};
use nalgebra::Vector3;
use serde::Serialize;

/// Plane-local coordinates of a world point.
#[inline]
pub fn project_point(plane: &Plane, p: &WorldPoint) -> ProjectedPoint {
    let rel = p - plane.origin;
    ProjectedPoint::new(rel.dot(&plane.first), rel.dot(&plane.second))
}

pub fn project_points(plane: &Plane, points: &[WorldPoint]) -> Vec<ProjectedPoint> {
    points.iter().map(|p| project_point(plane, p)).collect()
}

/// Plane-local components of a direction vector (no origin shift).
#[inline]
pub fn project_vector(plane: &Plane, v: &Vector3<f32>) -> ProjectedPoint {
    ProjectedPoint::new(v.dot(&plane.first), v.dot(&plane.second))
}

/// Pixel segment spanning the image along one projected axis.
pub type PixelLine = ([f32; 2], [f32; 2]);

/// Plane axes drawn into the camera image, each clipped to the image border.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectedPlane {
    pub origin: [f32; 2],
    pub first_axis: PixelLine,
    pub second_axis: PixelLine,
    pub normal_axis: PixelLine,
    /// Camera view direction drawn from the plane origin. `None` when it
    /// collapses to a point, i.e. the origin lies on the optical axis.
    pub view_axis: Option<PixelLine>,
}

pub fn project_plane_to_image(
    plane: &Plane,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
    size: ImageSize,
) -> Result<ProjectedPlane> {
    let origin = project_world_to_pixel(&plane.origin, pose, intrinsics)?;
    let axis = |v: &Vector3<f32>| project_axis(&plane.origin, v, pose, intrinsics, size);
    Ok(ProjectedPlane {
        origin,
        first_axis: axis(&plane.first)?,
        second_axis: axis(&plane.second)?,
        normal_axis: axis(&plane.normal)?,
        view_axis: axis(&pose.view_direction()).ok(),
    })
}

/// Projects the line through `origin` along `dir` and clips it to the image.
fn project_axis(
    origin: &WorldPoint,
    dir: &Vector3<f32>,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
    size: ImageSize,
) -> Result<PixelLine> {
    let visible: Vec<[f32; 2]> = [*origin, origin + dir, origin - dir]
        .iter()
        .filter_map(|p| project_world_to_pixel(p, pose, intrinsics).ok())
        .collect();
    match (visible.first(), visible.last()) {
        (Some(&a), Some(&b)) => clip_line_to_image(a, b, size),
        _ => Err(EstimationError::PointBehindCamera),
    }
}

/// Intersections of the infinite line through `a` and `b` with the image
/// border (`x ∈ [0, w-1]`, `y ∈ [0, h-1]`). Returns the first and last
/// intersection found, in left, right, top, bottom edge order.
pub fn clip_line_to_image(a: [f32; 2], b: [f32; 2], size: ImageSize) -> Result<PixelLine> {
    let w = size.width as f32;
    let h = size.height as f32;
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let mut hits: Vec<[f32; 2]> = Vec::with_capacity(4);

    if dx != 0.0 {
        for x in [0.0, w - 1.0] {
            let s = (x - a[0]) / dx;
            let y = a[1] + s * dy;
            if y >= 0.0 && y < h {
                hits.push([x, y]);
            }
        }
    }
    if dy != 0.0 {
        for y in [0.0, h - 1.0] {
            let s = (y - a[1]) / dy;
            let x = a[0] + s * dx;
            if x >= 0.0 && x < w {
                hits.push([x, y]);
            }
        }
    }

    match (hits.first(), hits.last()) {
        (Some(&p), Some(&q)) => Ok((p, q)),
        _ => Err(EstimationError::ProjectionOutsideImage),
    }
}
