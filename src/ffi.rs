//! C ABI for host applications.
//!
//! Functions return a non-negative value on success and a negative status
//! on failure; nothing here panics across the boundary.
use crate::localization::location_from_delta;
use crate::plane::fit_plane_pca;
use crate::types::{GeoCoordinate, LocationDelta};
use nalgebra::Vector3;

pub const AE_OK: i32 = 0;
pub const AE_NULL_POINTER: i32 = -1;
pub const AE_ESTIMATION_FAILED: i32 = -2;

/// Fits a plane to `point_count` packed `xyz` points and writes 12 floats to
/// `out_ptr`: origin, normal, first axis, second axis.
///
/// # Safety
/// `points_ptr` must be valid for `3 * point_count` reads and `out_ptr` for
/// 12 writes.
#[no_mangle]
pub unsafe extern "C" fn ae_fit_plane(
    points_ptr: *const f32,
    point_count: usize,
    out_ptr: *mut f32,
) -> i32 {
    if points_ptr.is_null() || out_ptr.is_null() {
        return AE_NULL_POINTER;
    }
    let input = unsafe { std::slice::from_raw_parts(points_ptr, point_count * 3) };
    let points: Vec<Vector3<f32>> = input
        .chunks_exact(3)
        .map(|c| Vector3::new(c[0], c[1], c[2]))
        .collect();
    match fit_plane_pca(&points) {
        Ok(plane) => {
            let output = unsafe { std::slice::from_raw_parts_mut(out_ptr, 12) };
            for (i, v) in [plane.origin, plane.normal, plane.first, plane.second]
                .iter()
                .enumerate()
            {
                output[3 * i..3 * i + 3].copy_from_slice(v.as_slice());
            }
            AE_OK
        }
        Err(_) => AE_ESTIMATION_FAILED,
    }
}

/// Applies an east/north offset in metres to a device fix.
///
/// # Safety
/// `out_lat` and `out_lon` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ae_location_from_delta(
    east: f32,
    north: f32,
    latitude: f64,
    longitude: f64,
    out_lat: *mut f64,
    out_lon: *mut f64,
) -> i32 {
    if out_lat.is_null() || out_lon.is_null() {
        return AE_NULL_POINTER;
    }
    let c = location_from_delta(
        LocationDelta::new(east, north),
        GeoCoordinate::new(latitude, longitude),
    );
    if !(c.latitude.is_finite() && c.longitude.is_finite()) {
        return AE_ESTIMATION_FAILED;
    }
    unsafe {
        *out_lat = c.latitude;
        *out_lon = c.longitude;
    }
    AE_OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_plane_writes_packed_frame() {
        let mut pts = Vec::new();
        for i in 0..5 {
            for j in 0..4 {
                pts.extend_from_slice(&[i as f32 * 0.3, 0.0, -(j as f32) * 0.2]);
            }
        }
        let mut out = [0.0f32; 12];
        let status = unsafe { ae_fit_plane(pts.as_ptr(), pts.len() / 3, out.as_mut_ptr()) };
        assert_eq!(status, AE_OK);
        assert!((out[4] - 1.0).abs() < 1e-4, "normal {:?}", &out[3..6]);
    }

    #[test]
    fn fit_plane_rejects_bad_input() {
        let mut out = [0.0f32; 12];
        let pts = [0.0f32, 0.0, 0.0];
        assert_eq!(
            unsafe { ae_fit_plane(std::ptr::null(), 0, out.as_mut_ptr()) },
            AE_NULL_POINTER
        );
        assert_eq!(
            unsafe { ae_fit_plane(pts.as_ptr(), 1, out.as_mut_ptr()) },
            AE_ESTIMATION_FAILED
        );
    }

    #[test]
    fn location_moves_north() {
        let (mut lat, mut lon) = (0.0f64, 0.0f64);
        let status = unsafe { ae_location_from_delta(0.0, 100.0, 10.0, 20.0, &mut lat, &mut lon) };
        assert_eq!(status, AE_OK);
        assert!(lat > 10.0);
        assert!((lon - 20.0).abs() < 1e-9);
    }
}
