//! Read-only row access shared by the per-pixel capture maps.
use crate::camera::ImageSize;

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn size(&self) -> ImageSize {
        ImageSize::new(self.width(), self.height())
    }

    /// Pixel at `(x, y)`, or `None` outside the map.
    #[inline]
    fn get(&self, x: usize, y: usize) -> Option<Self::Pixel> {
        if y >= self.height() {
            return None;
        }
        self.row(y).get(x).copied()
    }

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
