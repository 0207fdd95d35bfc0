use crate::color::{Color, color_from_hsb};
use crate::geometry::{MarkerBounds, Size};
use crate::marker::SelectionMarker;
use crate::pointer::PointerState;
use crate::raster::{RasterGrid, render_hue_ramp, step_value};

/// Emitted by the hue slider when the user moves it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderChange {
    pub hue: f32,
    /// The fully saturated, full brightness color of `hue`.
    pub color: Color,
}

/// The 1D hue picker.
///
/// The marker only moves along the x axis and sits vertically centered. The hue is
/// derived from the marker column, so the rightmost column is always hue `1.0`.
#[derive(Clone, Debug)]
pub struct SliderController {
    size: Size,
    grid: Option<RasterGrid>,
    marker: SelectionMarker,
    position: (i32, i32),
    hue: f32,
    pointer: PointerState,
    external_updates: usize,
}

impl SliderController {
    pub fn new(size: Size, hue: f32) -> Self {
        let hue = hue.clamp(0.0, 1.0);
        let mut this = Self {
            size,
            grid: render_hue_ramp(size),
            marker: SelectionMarker::new(color_from_hsb(hue, 1.0, 1.0), slider_bounds(size)),
            position: (0, 0),
            hue,
            pointer: PointerState::Idle,
            external_updates: 0,
        };
        this.place_marker();
        this
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// The pure color of the current hue.
    pub fn color(&self) -> Color {
        color_from_hsb(self.hue, 1.0, 1.0)
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn grid(&self) -> Option<&RasterGrid> {
        self.grid.as_ref()
    }

    pub fn marker(&self) -> &SelectionMarker {
        &self.marker
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    pub fn external_updates(&self) -> usize {
        self.external_updates
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) -> SliderChange {
        self.pointer = PointerState::Dragging;
        self.select(x, y)
    }

    pub fn pointer_move(&mut self, x: i32, y: i32) -> Option<SliderChange> {
        if !self.pointer.is_dragging() {
            return None;
        }
        Some(self.select(x, y))
    }

    pub fn pointer_up(&mut self) {
        self.pointer = PointerState::Idle;
    }

    /// Move the marker to `hue`, clamped to `0.0..=1.0`. Does not emit a change.
    pub fn set_selected_hue(&mut self, hue: f32) {
        self.external_updates += 1;
        self.hue = hue.clamp(0.0, 1.0);
        self.place_marker();
    }

    /// Re-render the ramp for `size` and put the marker back on the current hue.
    ///
    /// A degenerate size is ignored.
    pub fn update_size(&mut self, size: Size) -> bool {
        let Some(grid) = render_hue_ramp(size) else {
            tracing::debug!(?size, "slider resize deferred");
            return false;
        };

        self.size = size;
        self.grid = Some(grid);
        self.marker.set_bounds(slider_bounds(size));
        self.place_marker();
        true
    }

    fn select(&mut self, x: i32, y: i32) -> SliderChange {
        self.position = self.marker.clamp(x, y);
        if self.grid.is_some() {
            let local_x = (self.position.0 - self.marker.bounds().min_x) as usize;
            self.hue = step_value(local_x, self.size.width);
        }
        self.marker.set_color(self.color());

        let change = SliderChange {
            hue: self.hue,
            color: self.color(),
        };
        tracing::trace!(hue = change.hue, color = %change.color, "slider selection");
        change
    }

    fn place_marker(&mut self) {
        let bounds = self.marker.bounds();
        let x = bounds.min_x + (self.hue * (bounds.width() - 1) as f32).round() as i32;
        self.position = self.marker.clamp(x, bounds.min_y);
        self.marker.set_color(self.color());
    }
}

fn slider_bounds(size: Size) -> MarkerBounds {
    let middle = (size.height / 2) as i32;
    MarkerBounds::new(0, size.width.saturating_sub(1) as i32, middle, middle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_stays_vertically_centered() {
        let mut slider = SliderController::new(Size::new(361, 20), 0.0);
        assert_eq!(slider.position(), (0, 10));

        slider.pointer_down(120, 0);
        assert_eq!(slider.position(), (120, 10));
        slider.pointer_move(240, 19);
        assert_eq!(slider.position(), (240, 10));
    }

    #[test]
    fn test_drag_emits_hue_and_color() {
        let mut slider = SliderController::new(Size::new(361, 20), 0.0);
        assert_eq!(slider.pointer_move(100, 10), None);

        let change = slider.pointer_down(120, 10);
        assert!((change.hue - 1.0 / 3.0).abs() < 1e-4);
        assert_eq!(change.color, Color::rgb(0, 255, 0));
        assert_eq!(slider.marker().color(), Color::rgb(0, 255, 0));

        let change = slider.pointer_move(240, 10).unwrap();
        assert!((change.hue - 2.0 / 3.0).abs() < 1e-4);
        assert_eq!(change.color, Color::rgb(0, 0, 255));

        slider.pointer_up();
        assert_eq!(slider.pointer_move(0, 10), None);
        assert_eq!(slider.external_updates(), 0);
    }

    #[test]
    fn test_rightmost_column_is_full_hue() {
        let mut slider = SliderController::new(Size::new(257, 12), 0.5);
        let change = slider.pointer_down(10_000, 6);
        assert_eq!(change.hue, 1.0);
        assert_eq!(change.color, Color::RED);

        let change = slider.pointer_move(-10, 6).unwrap();
        assert_eq!(change.hue, 0.0);
    }

    #[test]
    fn test_set_selected_hue_clamps() {
        let mut slider = SliderController::new(Size::new(101, 10), 0.0);
        slider.set_selected_hue(0.5);
        assert_eq!(slider.position(), (50, 5));
        assert_eq!(slider.hue(), 0.5);

        slider.set_selected_hue(3.0);
        assert_eq!(slider.hue(), 1.0);
        assert_eq!(slider.position(), (100, 5));

        slider.set_selected_hue(-1.0);
        assert_eq!(slider.hue(), 0.0);
        assert_eq!(slider.position(), (0, 5));
        assert_eq!(slider.external_updates(), 3);
    }

    #[test]
    fn test_update_size_reapplies_hue() {
        let mut slider = SliderController::new(Size::new(101, 10), 0.5);
        assert!(slider.update_size(Size::new(201, 30)));
        assert_eq!(slider.position(), (100, 15));
        assert_eq!(slider.hue(), 0.5);
        assert_eq!(slider.grid().map(|g| g.size()), Some(Size::new(201, 30)));

        assert!(!slider.update_size(Size::new(1, 30)));
        assert_eq!(slider.size(), Size::new(201, 30));
    }

    #[test]
    fn test_unrendered_slider_keeps_hue() {
        let mut slider = SliderController::new(Size::new(0, 0), 0.25);
        assert!(slider.grid().is_none());
        let change = slider.pointer_down(30, 0);
        assert_eq!(change.hue, 0.25);
    }
}
