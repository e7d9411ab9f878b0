//! 16-bit raster plane.

use crate::Rect;

/// A row-major plane of 16-bit pixels.
///
/// Colour planes hold palette-relative indices, attribute planes hold packed
/// attribute words. The plane itself gives no meaning to either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap16 {
    width: usize,
    height: usize,
    pixels: Vec<u16>,
}

impl Bitmap16 {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Full-plane rectangle.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Reallocate to a new size. Contents are cleared only when the size
    /// actually changes. Returns true if a reallocation happened.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width * height];
        true
    }

    #[must_use]
    pub fn pix(&self, x: usize, y: usize) -> u16 {
        self.pixels[y * self.width + x]
    }

    pub fn set_pix(&mut self, x: usize, y: usize, value: u16) {
        self.pixels[y * self.width + x] = value;
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &[u16] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u16] {
        let start = y * self.width;
        &mut self.pixels[start..start + self.width]
    }

    /// Fill `clip` with `value`. The part of `clip` outside the plane is
    /// ignored.
    pub fn fill(&mut self, value: u16, clip: Rect) {
        let min_x = clip.min_x.max(0) as usize;
        let min_y = clip.min_y.max(0) as usize;
        if clip.max_x < 0 || clip.max_y < 0 {
            return;
        }
        let max_x = (clip.max_x as usize).min(self.width.saturating_sub(1));
        let max_y = (clip.max_y as usize).min(self.height.saturating_sub(1));
        if self.width == 0 || min_x > max_x || min_y > max_y {
            return;
        }
        for y in min_y..=max_y {
            self.row_mut(y)[min_x..=max_x].fill(value);
        }
    }

    #[must_use]
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }
}
