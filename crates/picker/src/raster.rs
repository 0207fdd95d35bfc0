//! Rasterization of the saturation/brightness field and the hue ramp.
//!
//! Both gradients walk their axis with a running accumulator of `1 / (len - 1)`,
//! clamped to `0.0..=1.0`, and pin the last sample to exactly `1.0`.

use crate::color::{Color, color_from_hsb};
use crate::geometry::Size;

/// A row-major grid of colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterGrid {
    size: Size,
    pixels: Vec<Color>,
}

impl RasterGrid {
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The color at `(x, y)`, or `None` if the position is outside of the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels.get(y * self.size.width + x).copied()
    }

    pub fn row(&self, y: usize) -> Option<&[Color]> {
        if y >= self.size.height {
            return None;
        }
        let start = y * self.size.width;
        self.pixels.get(start..start + self.size.width)
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

/// Iterator over the normalized sample positions of a gradient axis.
#[derive(Clone, Debug)]
pub struct GradientSteps {
    len: usize,
    index: usize,
    step: f32,
    value: f32,
}

impl Iterator for GradientSteps {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.len {
            return None;
        }

        let current = if self.len > 1 && self.index + 1 == self.len {
            1.0
        } else {
            self.value
        };
        self.index += 1;
        self.value = (self.value + self.step).clamp(0.0, 1.0);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GradientSteps {}

/// The `len` sample positions of a gradient axis, from `0.0` to exactly `1.0`.
pub fn gradient_steps(len: usize) -> GradientSteps {
    let step = if len > 1 {
        1.0 / (len - 1) as f32
    } else {
        0.0
    };
    GradientSteps {
        len,
        index: 0,
        step,
        value: 0.0,
    }
}

/// The sample position at `index` of an axis of `len` samples.
///
/// Indices past the end resolve to `1.0`.
pub fn step_value(index: usize, len: usize) -> f32 {
    gradient_steps(len).nth(index).unwrap_or(1.0)
}

/// Render the saturation/brightness field for `hue`.
///
/// Saturation grows left to right, brightness falls top to bottom. Returns `None` for a
/// degenerate size, the caller keeps whatever grid it had.
pub fn render_field(size: Size, hue: f32) -> Option<RasterGrid> {
    if size.is_degenerate() {
        tracing::debug!(?size, "skip field render for degenerate size");
        return None;
    }

    let saturations: Vec<f32> = gradient_steps(size.width).collect();
    let mut pixels = Vec::with_capacity(size.width * size.height);
    for brightness in gradient_steps(size.height).map(|t| 1.0 - t) {
        pixels.extend(
            saturations
                .iter()
                .map(|&saturation| color_from_hsb(hue, saturation, brightness)),
        );
    }

    tracing::trace!(?size, hue, "rendered field");
    Some(RasterGrid { size, pixels })
}

/// Render the full-spectrum hue ramp at full saturation and brightness.
///
/// Hue grows left to right; every row is the same. Returns `None` for a degenerate size.
pub fn render_hue_ramp(size: Size) -> Option<RasterGrid> {
    if size.is_degenerate() {
        tracing::debug!(?size, "skip hue ramp render for degenerate size");
        return None;
    }

    let column: Vec<Color> = gradient_steps(size.width)
        .map(|hue| color_from_hsb(hue, 1.0, 1.0))
        .collect();
    let mut pixels = Vec::with_capacity(size.width * size.height);
    for _ in 0..size.height {
        pixels.extend_from_slice(&column);
    }

    tracing::trace!(?size, "rendered hue ramp");
    Some(RasterGrid { size, pixels })
}

/// The color [`render_field`] puts at `(x, y)`, computed without rendering the grid.
pub fn field_color_at(size: Size, hue: f32, x: usize, y: usize) -> Color {
    let saturation = step_value(x, size.width);
    let brightness = 1.0 - step_value(y, size.height);
    color_from_hsb(hue, saturation, brightness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_steps_end_exactly_at_one() {
        for len in [2, 3, 7, 10, 99, 255, 256, 1000, 4097] {
            let steps: Vec<f32> = gradient_steps(len).collect();
            assert_eq!(steps.len(), len);
            assert_eq!(steps[0], 0.0);
            assert_eq!(steps[len - 1], 1.0, "len {len}");
            assert!(steps.iter().all(|s| (0.0..=1.0).contains(s)));
            assert!(steps.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_gradient_steps_single_sample() {
        assert_eq!(gradient_steps(1).collect::<Vec<_>>(), vec![0.0]);
        assert_eq!(gradient_steps(0).count(), 0);
    }

    #[test]
    fn test_step_value_matches_iterator() {
        let steps: Vec<f32> = gradient_steps(37).collect();
        for (index, value) in steps.iter().enumerate() {
            assert_eq!(step_value(index, 37), *value);
        }
        assert_eq!(step_value(100, 37), 1.0);
    }

    #[test]
    fn test_degenerate_sizes_render_nothing() {
        for size in [Size::new(0, 0), Size::new(1, 50), Size::new(50, 1)] {
            assert!(render_field(size, 0.5).is_none());
            assert!(render_hue_ramp(size).is_none());
        }
    }

    #[test]
    fn test_field_corners() {
        let grid = render_field(Size::new(64, 48), 0.0).unwrap();
        assert_eq!(grid.size(), Size::new(64, 48));
        assert_eq!(grid.pixels().len(), 64 * 48);

        assert_eq!(grid.get(0, 0), Some(Color::WHITE));
        assert_eq!(grid.get(63, 0), Some(Color::RED));
        assert_eq!(grid.get(0, 47), Some(Color::BLACK));
        assert_eq!(grid.get(63, 47), Some(Color::BLACK));
        assert_eq!(grid.get(64, 0), None);
        assert_eq!(grid.get(0, 48), None);
    }

    #[test]
    fn test_field_last_column_is_fully_saturated() {
        let grid = render_field(Size::new(301, 3), 2.0 / 3.0).unwrap();
        let top = grid.row(0).unwrap();
        assert_eq!(top[300], Color::rgb(0, 0, 255));
        let hsb = top[300].to_hsb();
        assert_eq!(hsb.s, 1.0);
        assert_eq!(hsb.v, 1.0);
    }

    #[test]
    fn test_field_matches_point_lookup() {
        let size = Size::new(40, 30);
        let grid = render_field(size, 0.3).unwrap();
        for (x, y) in [(0, 0), (13, 7), (39, 29), (20, 15), (39, 0)] {
            assert_eq!(grid.get(x, y), Some(field_color_at(size, 0.3, x, y)));
        }
    }

    #[test]
    fn test_hue_ramp() {
        let grid = render_hue_ramp(Size::new(361, 4)).unwrap();
        assert_eq!(grid.get(0, 0), Some(Color::RED));
        assert_eq!(grid.get(120, 0), Some(Color::rgb(0, 255, 0)));
        assert_eq!(grid.get(240, 0), Some(Color::rgb(0, 0, 255)));
        // Hue 1.0 wraps back to red.
        assert_eq!(grid.get(360, 0), Some(Color::RED));

        for y in 1..4 {
            assert_eq!(grid.row(y), grid.row(0));
        }
        assert!(grid.row(4).is_none());
    }
}
