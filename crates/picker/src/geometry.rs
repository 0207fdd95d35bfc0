use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The pixel size of a rasterized area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Returns true if the size is too small to hold a gradient: either side is `<= 1`.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 1 || self.height <= 1
    }
}

/// The inclusive rectangle a selection marker may occupy, in pointer coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl MarkerBounds {
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x: max_x.max(min_x),
            min_y,
            max_y: max_y.max(min_y),
        }
    }

    /// Bounds covering every pixel of a grid of `size`, anchored at the origin.
    pub fn from_size(size: Size) -> Self {
        Self::new(
            0,
            size.width.saturating_sub(1) as i32,
            0,
            size.height.saturating_sub(1) as i32,
        )
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    #[inline]
    pub fn clamp_x(&self, x: i32) -> i32 {
        x.clamp(self.min_x, self.max_x)
    }

    #[inline]
    pub fn clamp_y(&self, y: i32) -> i32 {
        y.clamp(self.min_y, self.max_y)
    }
}
