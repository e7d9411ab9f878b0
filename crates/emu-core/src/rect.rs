//! Inclusive clip rectangle.

/// An inclusive screen rectangle, `min..=max` on both axes.
///
/// Chip passes always iterate `min_y..=max_y` then `min_x..=max_x`, matching
/// how the hardware counts visible beam positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Rectangle covering a whole `width` x `height` plane.
    #[must_use]
    pub const fn from_size(width: usize, height: usize) -> Self {
        Self::new(0, width as i32 - 1, 0, height as i32 - 1)
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// True when every pixel of `self` lies inside a `width` x `height` plane.
    #[must_use]
    pub const fn fits_within(&self, width: usize, height: usize) -> bool {
        self.is_empty()
            || (self.min_x >= 0
                && self.min_y >= 0
                && (self.max_x as i64) < width as i64
                && (self.max_y as i64) < height as i64)
    }
}
