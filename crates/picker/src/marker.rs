use crate::color::Color;
use crate::geometry::MarkerBounds;
use crate::raster::RasterGrid;

/// The selection marker drawn over a field or slider.
///
/// It owns the bounds the pointer is clamped to and remembers the last color it
/// displayed, which doubles as the fallback while no grid has been rasterized yet.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionMarker {
    bounds: MarkerBounds,
    color: Color,
}

impl SelectionMarker {
    pub fn new(color: Color, bounds: MarkerBounds) -> Self {
        Self { bounds, color }
    }

    pub fn bounds(&self) -> MarkerBounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: MarkerBounds) {
        self.bounds = bounds;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Clip `(x, y)` to the bounds, each axis on its own.
    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        (self.bounds.clamp_x(x), self.bounds.clamp_y(y))
    }

    /// The grid color under `(x, y)` after clamping, in grid coordinates relative to the
    /// bounds origin.
    ///
    /// Falls back to the marker's last color if the grid is absent or smaller than the
    /// bounds.
    pub fn color_at(&self, grid: Option<&RasterGrid>, x: i32, y: i32) -> Color {
        let (x, y) = self.clamp(x, y);
        let local_x = (x - self.bounds.min_x) as usize;
        let local_y = (y - self.bounds.min_y) as usize;
        grid.and_then(|grid| grid.get(local_x, local_y)).unwrap_or(self.color)
    }
}
