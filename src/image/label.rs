//! Owned per-pixel semantic class map (`u8` class ids, row-major).
use super::traits::ImageView;
use crate::error::{EstimationError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMap {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl LabelMap {
    /// Map of size `w × h` filled with `fill`.
    pub fn new(w: usize, h: usize, fill: u8) -> Self {
        Self {
            w,
            h,
            data: vec![fill; w * h],
        }
    }

    pub fn from_vec(w: usize, h: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != w * h {
            return Err(EstimationError::BufferSizeMismatch {
                expected: w * h,
                found: data.len(),
            });
        }
        Ok(Self { w, h, data })
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, class: u8) {
        let i = y * self.w + x;
        self.data[i] = class;
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of pixels carrying `class`.
    pub fn count(&self, class: u8) -> usize {
        self.data.iter().filter(|&&c| c == class).count()
    }
}

impl ImageView for LabelMap {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
