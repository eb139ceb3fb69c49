use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Position in the gravity-aligned world frame (x east, y up, z south).
pub type WorldPoint = Vector3<f32>;

/// World-frame up axis.
pub const UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// Point expressed in plane-local coordinates: `s` along the running axis,
/// `t` along the cross axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub s: f32,
    pub t: f32,
}

impl ProjectedPoint {
    pub fn new(s: f32, t: f32) -> Self {
        Self { s, t }
    }
}

/// Robust width of a single bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BinWidth {
    pub width: f32,
    pub count: usize,
}

/// Geographic coordinate in degrees (WGS84 latitude/longitude).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Planar offset of a feature relative to the device, in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationDelta {
    pub east: f32,
    pub north: f32,
}

impl LocationDelta {
    pub fn new(east: f32, north: f32) -> Self {
        Self { east, north }
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        (self.east * self.east + self.north * self.north).sqrt()
    }

    /// Arithmetic mean of a set of deltas; `None` when empty.
    pub fn mean(deltas: &[LocationDelta]) -> Option<LocationDelta> {
        if deltas.is_empty() {
            return None;
        }
        let n = deltas.len() as f32;
        let (east, north) = deltas
            .iter()
            .fold((0.0f32, 0.0f32), |(e, nn), d| (e + d.east, nn + d.north));
        Some(LocationDelta::new(east / n, north / n))
    }
}
