//! Angle and direction utilities used across the estimation pipeline.
use crate::types::UP;
use nalgebra::Vector3;

const EPS: f32 = 1e-6;

/// Normalizes `v`, returning `None` when its length is at or below `min_len`.
#[inline]
pub fn normalize_checked(v: &Vector3<f32>, min_len: f32) -> Option<Vector3<f32>> {
    let len = v.norm();
    if !len.is_finite() || len <= min_len {
        None
    } else {
        Some(v / len)
    }
}

/// Drops the vertical component of `v` and normalizes what is left.
#[inline]
pub fn horizontal_direction(v: &Vector3<f32>) -> Option<Vector3<f32>> {
    normalize_checked(&(v - v.dot(&UP) * UP), EPS)
}

/// Absolute cosine between two vectors after both are flattened onto the
/// horizontal plane. Returns a value in [0, 1]; zero when either vector has
/// no horizontal extent.
#[inline]
pub fn horizontal_alignment(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    match (horizontal_direction(a), horizontal_direction(b)) {
        (Some(ha), Some(hb)) => ha.dot(&hb).abs().clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Inclination of `v` against the horizontal plane in degrees, as a
/// non-negative magnitude in [0, 90].
#[inline]
pub fn slope_angle_deg(v: &Vector3<f32>) -> f32 {
    let rise = v.dot(&UP);
    let run = (v - rise * UP).norm();
    rise.abs().atan2(run).to_degrees()
}

/// Computes the unsigned angle between two 3D vectors in radians.
/// Returns a value in [0, π].
#[inline]
pub fn angle_between(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    let na = a.norm().max(EPS);
    let nb = b.norm().max(EPS);
    (a.dot(b) / (na * nb)).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn horizontal_alignment_ignores_vertical_component() {
        let a = Vector3::new(1.0, 5.0, 0.0);
        let b = Vector3::new(-2.0, -1.0, 0.0);
        assert!(approx_eq(horizontal_alignment(&a, &b), 1.0));

        let c = Vector3::new(0.0, 0.3, 1.0);
        assert!(approx_eq(horizontal_alignment(&a, &c), 0.0));
    }

    #[test]
    fn horizontal_alignment_of_vertical_vector_is_zero() {
        let vertical = Vector3::new(0.0, 1.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(horizontal_alignment(&vertical, &b), 0.0);
    }

    #[test]
    fn slope_angle_is_non_negative() {
        let up_ramp = Vector3::new(1.0, 1.0, 0.0);
        let down_ramp = Vector3::new(1.0, -1.0, 0.0);
        assert!(approx_eq(slope_angle_deg(&up_ramp), 45.0));
        assert!(approx_eq(slope_angle_deg(&down_ramp), 45.0));
        assert!(approx_eq(slope_angle_deg(&Vector3::new(0.0, 0.0, 1.0)), 0.0));
    }

    #[test]
    fn angle_between_basic() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert!(approx_eq(angle_between(&x, &y), std::f32::consts::FRAC_PI_2));
        assert!(approx_eq(angle_between(&x, &-x), std::f32::consts::PI));
    }

    #[test]
    fn normalize_checked_rejects_short_vectors() {
        assert!(normalize_checked(&Vector3::new(1e-4, 0.0, 0.0), 1e-3).is_none());
        let n = normalize_checked(&Vector3::new(0.0, 3.0, 4.0), 1e-3).unwrap();
        assert!(approx_eq(n.norm(), 1.0));
    }
}
