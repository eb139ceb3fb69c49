//! Owned per-pixel depth map in metres (row-major, `f32`).
//!
//! A value of `0` means the sensor produced no measurement for that pixel.
//! Samplers take normalized points (origin bottom-left, y up) because that is
//! how feature descriptors address the image.
use super::traits::ImageView;
use crate::error::{EstimationError, Result};
use crate::params::DepthRange;

#[derive(Clone, Debug, PartialEq)]
pub struct DepthMap {
    w: usize,
    h: usize,
    data: Vec<f32>,
}

impl DepthMap {
    /// Zero-filled map of size `w × h` (no measurements).
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != w * h {
            return Err(EstimationError::BufferSizeMismatch {
                expected: w * h,
                found: data.len(),
            });
        }
        Ok(Self { w, h, data })
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, depth: f32) {
        let i = y * self.w + x;
        self.data[i] = depth;
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Pixel containing the normalized point, clamped to the map.
    fn pixel_of(&self, p: [f32; 2]) -> Option<(usize, usize)> {
        if self.w == 0 || self.h == 0 || !p[0].is_finite() || !p[1].is_finite() {
            return None;
        }
        let [px, py] = self.size().normalized_to_pixel(p);
        let x = (px.floor().max(0.0) as usize).min(self.w - 1);
        let y = (py.floor().max(0.0) as usize).min(self.h - 1);
        Some((x, y))
    }

    /// Depth of the pixel under the normalized point `p`.
    pub fn depth_at_normalized(&self, p: [f32; 2], range: &DepthRange) -> Result<f32> {
        self.mean_depth_around(p, 0, range)
    }

    /// Mean of the valid depths in the `(2r+1)²` window centred on the pixel
    /// under `p`. Fails when the window holds no valid sample.
    pub fn mean_depth_around(&self, p: [f32; 2], radius: usize, range: &DepthRange) -> Result<f32> {
        let missing = EstimationError::MissingDepth { x: p[0], y: p[1] };
        let (cx, cy) = self.pixel_of(p).ok_or_else(|| missing.clone())?;
        let x0 = cx.saturating_sub(radius);
        let x1 = (cx + radius).min(self.w - 1);
        let y0 = cy.saturating_sub(radius);
        let y1 = (cy + radius).min(self.h - 1);

        let mut sum = 0.0f64;
        let mut n = 0usize;
        for y in y0..=y1 {
            for &d in &self.row(y)[x0..=x1] {
                if range.contains(d) {
                    sum += d as f64;
                    n += 1;
                }
            }
        }
        if n == 0 {
            return Err(missing);
        }
        Ok((sum / n as f64) as f32)
    }

    /// Samples every point; the first point without a valid depth fails the
    /// whole batch.
    pub fn depths_at_normalized(
        &self,
        points: &[[f32; 2]],
        radius: usize,
        range: &DepthRange,
    ) -> Result<Vec<f32>> {
        points
            .iter()
            .map(|&p| self.mean_depth_around(p, radius, range))
            .collect()
    }
}

impl ImageView for DepthMap {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn normalized_sampling_flips_y() {
        let mut map = DepthMap::new(4, 4);
        map.set(0, 3, 1.5);
        map.set(0, 0, 2.5);
        let r = DepthRange::default();
        assert!(approx_eq(map.depth_at_normalized([0.0, 0.0], &r).unwrap(), 1.5));
        assert!(approx_eq(map.depth_at_normalized([0.0, 1.0], &r).unwrap(), 2.5));
    }

    #[test]
    fn window_mean_skips_invalid_samples() {
        let mut map = DepthMap::new(5, 5);
        map.set(2, 2, 1.0);
        map.set(1, 2, 3.0);
        map.set(3, 3, 9.0);
        let r = DepthRange::default();
        let d = map.mean_depth_around([0.5, 0.5], 1, &r).unwrap();
        assert!(approx_eq(d, 2.0));
    }

    #[test]
    fn missing_depth_is_an_error() {
        let map = DepthMap::new(3, 3);
        let err = map
            .depth_at_normalized([0.5, 0.5], &DepthRange::default())
            .unwrap_err();
        assert!(matches!(err, EstimationError::MissingDepth { .. }));
    }

    #[test]
    fn batch_sampling_fails_on_first_gap() {
        let mut map = DepthMap::new(2, 1);
        map.set(0, 0, 1.0);
        let r = DepthRange::default();
        assert_eq!(
            map.depths_at_normalized(&[[0.1, 0.5]], 0, &r).unwrap(),
            vec![1.0]
        );
        assert!(map.depths_at_normalized(&[[0.1, 0.5], [0.9, 0.5]], 0, &r).is_err());
    }
}
