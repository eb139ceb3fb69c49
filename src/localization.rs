//! Image points and world points → offsets from the device → coordinates.
//!
//! The world frame is assumed gravity and heading aligned (x east, y up,
//! z south), so a world offset from the camera maps directly onto a local
//! east/north tangent plane. Offsets become absolute coordinates through
//! the great-circle destination formula on a sphere of the WGS84 equatorial
//! radius.
//!
//! The trapezoid helpers are a coarse estimator for line-shaped features.
//! Their corners are ordered bottom-left, top-left, top-right, bottom-right
//! in normalized image coordinates. The bound comes from a contour heuristic
//! that can lock onto a narrow segment near one end of a line instead of the
//! wider true boundary; the estimates inherit that weakness.
use crate::angle::slope_angle_deg;
use crate::camera::{back_project_pixel, CameraIntrinsics, CameraPose, ImageSize};
use crate::error::{EstimationError, Result};
use crate::types::{GeoCoordinate, LocationDelta, WorldPoint};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Normalized image point (origin bottom-left) with its sampled depth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointWithDepth {
    pub point: [f32; 2],
    pub depth: f32,
}

impl PointWithDepth {
    pub fn new(point: [f32; 2], depth: f32) -> Self {
        Self { point, depth }
    }
}

/// Offset of `world` from the camera as `(east, up, north)` in metres.
#[inline]
pub fn local_offset_from_world_point(world: &WorldPoint, pose: &CameraPose) -> Vector3<f32> {
    let d = world - pose.position();
    Vector3::new(d.x, d.y, -d.z)
}

/// Offset of the surface seen at a normalized image point as
/// `(east, up, north)` in metres.
pub fn local_offset_from_point(
    point: [f32; 2],
    depth: f32,
    size: ImageSize,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
) -> Vector3<f32> {
    let [u, v] = size.normalized_to_pixel(point);
    let world = back_project_pixel(u, v, depth, pose, intrinsics);
    local_offset_from_world_point(&world, pose)
}

#[inline]
pub fn delta_from_world_point(world: &WorldPoint, pose: &CameraPose) -> LocationDelta {
    let o = local_offset_from_world_point(world, pose);
    LocationDelta::new(o.x, o.z)
}

pub fn delta_from_point(
    point: [f32; 2],
    depth: f32,
    size: ImageSize,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
) -> LocationDelta {
    let o = local_offset_from_point(point, depth, size, pose, intrinsics);
    LocationDelta::new(o.x, o.z)
}

/// Destination reached from `origin` after travelling `delta` on the sphere.
pub fn location_from_delta(delta: LocationDelta, origin: GeoCoordinate) -> GeoCoordinate {
    let east = delta.east as f64;
    let north = delta.north as f64;
    let distance = (east * east + north * north).sqrt();
    let bearing = east.atan2(north);
    let angular = distance / EARTH_RADIUS_M;

    let lat0 = origin.latitude.to_radians();
    let lon0 = origin.longitude.to_radians();

    let lat = (lat0.sin() * angular.cos() + lat0.cos() * angular.sin() * bearing.cos()).asin();
    let lon = lon0
        + (bearing.sin() * angular.sin() * lat0.cos()).atan2(angular.cos() - lat0.sin() * lat.sin());

    GeoCoordinate::new(lat.to_degrees(), lon.to_degrees())
}

pub fn location_from_point(
    point: [f32; 2],
    depth: f32,
    size: ImageSize,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
    origin: GeoCoordinate,
) -> GeoCoordinate {
    location_from_delta(delta_from_point(point, depth, size, pose, intrinsics), origin)
}

pub fn location_from_world_point(
    world: &WorldPoint,
    pose: &CameraPose,
    origin: GeoCoordinate,
) -> GeoCoordinate {
    location_from_delta(delta_from_world_point(world, pose), origin)
}

/// Corner offsets in bottom-left, top-left, top-right, bottom-right order.
fn trapezoid_offsets(
    corners: &[PointWithDepth],
    size: ImageSize,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
) -> Result<[Vector3<f32>; 4]> {
    if corners.len() != 4 {
        return Err(EstimationError::InvalidBounds {
            expected: 4,
            found: corners.len(),
        });
    }
    let o = |i: usize| local_offset_from_point(corners[i].point, corners[i].depth, size, pose, intrinsics);
    Ok([o(0), o(1), o(2), o(3)])
}

/// Mean of the bottom and top edge lengths of the trapezoid.
pub fn trapezoid_width(
    corners: &[PointWithDepth],
    size: ImageSize,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
) -> Result<f32> {
    let [bl, tl, tr, br] = trapezoid_offsets(corners, size, pose, intrinsics)?;
    let bottom = (br - bl).norm();
    let top = (tr - tl).norm();
    Ok(0.5 * (bottom + top))
}

/// Slope from the bottom-edge centre to the top-edge centre, in degrees.
pub fn trapezoid_running_slope(
    corners: &[PointWithDepth],
    size: ImageSize,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
) -> Result<f32> {
    let [bl, tl, tr, br] = trapezoid_offsets(corners, size, pose, intrinsics)?;
    let bottom_center = 0.5 * (bl + br);
    let top_center = 0.5 * (tl + tr);
    Ok(slope_angle_deg(&(top_center - bottom_center)))
}

/// Mean slope of the bottom and top edges, in degrees.
pub fn trapezoid_cross_slope(
    corners: &[PointWithDepth],
    size: ImageSize,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
) -> Result<f32> {
    let [bl, tl, tr, br] = trapezoid_offsets(corners, size, pose, intrinsics)?;
    let bottom = slope_angle_deg(&(br - bl));
    let top = slope_angle_deg(&(tr - tl));
    Ok(0.5 * (bottom + top))
}
