use std::time::Duration;

use instant::Instant;

use crate::color::Color;
use crate::geometry::{MarkerBounds, Size};
use crate::marker::SelectionMarker;
use crate::pointer::{PointerState, RegenThrottle};
use crate::raster::{RasterGrid, field_color_at, render_field};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldEvent {
    Change(Color),
}

/// The 2D saturation/brightness picker.
///
/// Owns the rasterized field for the current hue and the marker position on it. The
/// position is a view of the color: external updates move the marker, pointer input
/// reads the color back from under it.
#[derive(Clone, Debug)]
pub struct FieldController {
    size: Size,
    hue: f32,
    grid: Option<RasterGrid>,
    grid_hue: f32,
    marker: SelectionMarker,
    position: (i32, i32),
    color: Color,
    pointer: PointerState,
    throttle: RegenThrottle,
    external_updates: usize,
}

impl FieldController {
    pub fn new(size: Size, color: Color) -> Self {
        Self::with_hue(size, color, color.hue())
    }

    /// Create a field rendered for `hue`, which may differ from the hue of `color`
    /// when `color` is achromatic.
    pub fn with_hue(size: Size, color: Color, hue: f32) -> Self {
        let hue = hue.clamp(0.0, 1.0);
        let mut this = Self {
            size,
            hue,
            grid: render_field(size, hue),
            grid_hue: hue,
            marker: SelectionMarker::new(color, MarkerBounds::from_size(size)),
            position: (0, 0),
            color,
            pointer: PointerState::Idle,
            throttle: RegenThrottle::default(),
            external_updates: 0,
        };
        this.place_marker(color);
        this
    }

    /// Set the minimum interval between hue-driven regenerations, default: 50ms
    pub fn regen_interval(mut self, interval: Duration) -> Self {
        self.throttle = RegenThrottle::new(interval);
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// The color under the marker.
    pub fn color(&self) -> Color {
        self.color
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

    /// Returns true if a hue change is waiting for the throttle before the grid is
    /// regenerated.
    pub fn is_regen_pending(&self) -> bool {
        self.throttle.is_pending()
    }

    /// How many color or hue updates were pushed into this field from outside.
    pub fn external_updates(&self) -> usize {
        self.external_updates
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) -> FieldEvent {
        self.pointer_down_at(x, y, Instant::now())
    }

    pub fn pointer_down_at(&mut self, x: i32, y: i32, now: Instant) -> FieldEvent {
        self.flush_pending(now);
        self.pointer = PointerState::Dragging;
        self.select(x, y)
    }

    /// Track the pointer while dragging, ignored while idle.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> Option<FieldEvent> {
        self.pointer_move_at(x, y, Instant::now())
    }

    pub fn pointer_move_at(&mut self, x: i32, y: i32, now: Instant) -> Option<FieldEvent> {
        if !self.pointer.is_dragging() {
            return None;
        }
        self.flush_pending(now);
        Some(self.select(x, y))
    }

    pub fn pointer_up(&mut self) {
        self.pointer = PointerState::Idle;
    }

    /// Move the marker to the saturation/brightness of `color` without re-rasterizing.
    pub fn set_selected_color(&mut self, color: Color) {
        self.external_updates += 1;
        self.reposition(color);
    }

    /// Move the marker to `color` after a layout change. Not counted as an external update.
    pub(crate) fn reposition(&mut self, color: Color) {
        self.marker.set_color(color);
        self.place_marker(color);
    }

    /// Change the hue of the field, regenerating the grid unless throttled.
    ///
    /// Returns true if the grid was regenerated. While a regeneration is pending the
    /// color under the marker is still computed for the new hue.
    pub fn set_hue(&mut self, hue: f32) -> bool {
        self.set_hue_at(hue, Instant::now())
    }

    pub fn set_hue_at(&mut self, hue: f32, now: Instant) -> bool {
        self.external_updates += 1;
        self.hue = hue.clamp(0.0, 1.0);

        let regenerated = if self.throttle.request(now) {
            self.regenerate()
        } else {
            tracing::debug!(hue = self.hue, "field regeneration deferred");
            false
        };
        self.refresh_color();
        regenerated
    }

    /// Run a regeneration deferred by the throttle if its interval has passed.
    pub fn flush_pending(&mut self, now: Instant) -> bool {
        if self.throttle.poll(now) {
            self.regenerate()
        } else {
            false
        }
    }

    /// Regenerate the grid for a new size and re-clamp the marker.
    ///
    /// A degenerate size is a no-op: the previous grid and bounds are kept until the
    /// next usable size arrives.
    pub fn update_size(&mut self, size: Size) -> bool {
        let Some(grid) = render_field(size, self.hue) else {
            tracing::debug!(?size, "field resize deferred");
            return false;
        };

        self.size = size;
        self.grid = Some(grid);
        self.grid_hue = self.hue;
        self.throttle.reset_pending();
        self.marker.set_bounds(MarkerBounds::from_size(size));
        self.position = self.marker.clamp(self.position.0, self.position.1);
        self.refresh_color();
        true
    }

    fn place_marker(&mut self, color: Color) {
        let hsb = color.to_hsb();
        let bounds = self.marker.bounds();
        let x = bounds.min_x + (hsb.s.clamp(0.0, 1.0) * (bounds.width() - 1) as f32).round() as i32;
        let y = bounds.min_y
            + ((1.0 - hsb.v.clamp(0.0, 1.0)) * (bounds.height() - 1) as f32).round() as i32;
        self.position = self.marker.clamp(x, y);
        self.refresh_color();
    }

    fn select(&mut self, x: i32, y: i32) -> FieldEvent {
        self.position = self.marker.clamp(x, y);
        self.refresh_color();
        tracing::trace!(position = ?self.position, color = %self.color, "field selection");
        FieldEvent::Change(self.color)
    }

    fn regenerate(&mut self) -> bool {
        match render_field(self.size, self.hue) {
            Some(grid) => {
                self.grid = Some(grid);
                self.grid_hue = self.hue;
                true
            }
            None => false,
        }
    }

    fn refresh_color(&mut self) {
        let (x, y) = self.position;
        let color = match &self.grid {
            Some(grid) if self.grid_hue == self.hue => self.marker.color_at(Some(grid), x, y),
            Some(grid) => {
                let bounds = self.marker.bounds();
                field_color_at(
                    grid.size(),
                    self.hue,
                    (x - bounds.min_x) as usize,
                    (y - bounds.min_y) as usize,
                )
            }
            None => {
                let hsb = self.marker.color().to_hsb();
                Color::from_hsb(self.hue, hsb.s, hsb.v)
            }
        };
        self.color = color;
        self.marker.set_color(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(width: usize, height: usize, color: Color) -> FieldController {
        FieldController::new(Size::new(width, height), color)
    }

    #[test]
    fn test_initial_marker_follows_color() {
        let field = field(100, 80, Color::RED);
        assert_eq!(field.position(), (99, 0));
        assert_eq!(field.color(), Color::RED);
        assert!(field.grid().is_some());

        let field = field_with_white();
        assert_eq!(field.position(), (0, 0));
        assert_eq!(field.color(), Color::WHITE);
    }

    fn field_with_white() -> FieldController {
        FieldController::with_hue(Size::new(100, 80), Color::WHITE, 0.5)
    }

    #[test]
    fn test_drag_state_machine() {
        let mut field = field(100, 100, Color::RED);
        assert_eq!(field.pointer_move(10, 10), None);
        assert_eq!(field.pointer_state(), PointerState::Idle);

        let FieldEvent::Change(color) = field.pointer_down(0, 0);
        assert_eq!(color, Color::WHITE);
        assert_eq!(field.pointer_state(), PointerState::Dragging);

        assert_eq!(field.pointer_move(99, 99), Some(FieldEvent::Change(Color::BLACK)));
        assert_eq!(field.pointer_move(99, 0), Some(FieldEvent::Change(Color::RED)));
        assert_eq!(field.color(), Color::RED);

        field.pointer_up();
        assert_eq!(field.pointer_state(), PointerState::Idle);
        assert_eq!(field.pointer_move(0, 0), None);
        assert_eq!(field.color(), Color::RED);
        assert_eq!(field.external_updates(), 0);
    }

    #[test]
    fn test_pointer_is_clamped() {
        let mut field = field(50, 40, Color::RED);
        field.pointer_down(-20, 500);
        assert_eq!(field.position(), (0, 39));
        field.pointer_move(1000, -3);
        assert_eq!(field.position(), (49, 0));
        assert_eq!(field.marker().color(), field.color());
    }

    #[test]
    fn test_set_selected_color_within_one_cell() {
        let size = Size::new(200, 150);
        let mut field = FieldController::new(size, Color::RED);
        let before = field.grid().cloned();

        for color in [
            Color::rgb(200, 50, 50),
            Color::rgb(255, 128, 128),
            Color::rgb(90, 0, 0),
            Color::rgb(255, 0, 0),
        ] {
            field.set_selected_color(color);
            let expected = color.to_hsb();
            let actual = field.color().to_hsb();
            let cell_x = 1.0 / (size.width - 1) as f32;
            let cell_y = 1.0 / (size.height - 1) as f32;
            assert!((expected.s - actual.s).abs() <= cell_x + 1.0 / 255.0, "{color:?}");
            assert!((expected.v - actual.v).abs() <= cell_y + 1.0 / 255.0, "{color:?}");
        }

        assert_eq!(field.grid().cloned(), before);
        assert_eq!(field.external_updates(), 4);
    }

    #[test]
    fn test_hue_change_without_grid() {
        let mut field = field(0, 0, Color::RED);
        assert!(field.grid().is_none());
        assert_eq!(field.color(), Color::RED);

        assert!(!field.set_hue(1.0 / 3.0));
        assert_eq!(field.color(), Color::rgb(0, 255, 0));
        assert_eq!(field.marker().color(), Color::rgb(0, 255, 0));

        // Only saturation and brightness are taken from the color, the hue stays.
        field.set_selected_color(Color::rgb(128, 0, 0));
        assert_eq!(field.color(), Color::rgb(0, 128, 0));
    }

    #[test]
    fn test_reposition_is_not_an_external_update() {
        let mut field = field(40, 40, Color::RED);
        field.update_size(Size::new(80, 20));
        field.reposition(Color::RED);
        assert_eq!(field.position(), (79, 0));
        assert_eq!(field.color(), Color::RED);
        assert_eq!(field.external_updates(), 0);
    }

    #[test]
    fn test_set_hue_throttles_regeneration() {
        let start = Instant::now();
        let size = Size::new(60, 60);
        let mut field =
            FieldController::new(size, Color::RED).regen_interval(Duration::from_millis(50));

        assert!(field.set_hue_at(1.0 / 3.0, start));
        assert_eq!(field.grid().cloned(), render_field(size, 1.0 / 3.0));
        assert_eq!(field.color(), Color::rgb(0, 255, 0));

        // Too soon: the grid stays, the color already follows the new hue.
        assert!(!field.set_hue_at(2.0 / 3.0, start + Duration::from_millis(20)));
        assert!(field.is_regen_pending());
        assert_eq!(field.grid().cloned(), render_field(size, 1.0 / 3.0));
        assert_eq!(field.color(), Color::rgb(0, 0, 255));

        // The next pointer event past the interval runs the deferred regeneration.
        field.pointer_down_at(59, 0, start + Duration::from_millis(80));
        assert!(!field.is_regen_pending());
        assert_eq!(field.grid().cloned(), render_field(size, 2.0 / 3.0));
        assert_eq!(field.color(), Color::rgb(0, 0, 255));
    }

    #[test]
    fn test_update_size_reclamps_marker() {
        let mut field = field(100, 100, Color::RED);
        assert_eq!(field.position(), (99, 0));

        assert!(field.update_size(Size::new(50, 20)));
        assert_eq!(field.size(), Size::new(50, 20));
        assert_eq!(field.position(), (49, 0));
        assert_eq!(field.grid().map(|g| g.size()), Some(Size::new(50, 20)));
        assert_eq!(field.color(), Color::RED);
    }

    #[test]
    fn test_degenerate_resize_keeps_previous_grid() {
        let mut field = field(100, 100, Color::RED);
        let before = field.grid().cloned();
        assert!(!field.update_size(Size::new(0, 0)));
        assert_eq!(field.size(), Size::new(100, 100));
        assert_eq!(field.grid().cloned(), before);
    }

    #[test]
    fn test_unrendered_field_falls_back_to_last_color() {
        let mut field = field(0, 0, Color::rgb(10, 200, 30));
        assert!(field.grid().is_none());
        assert_eq!(field.color(), Color::rgb(10, 200, 30));

        field.pointer_down(5, 5);
        assert_eq!(field.color(), Color::rgb(10, 200, 30));

        field.set_selected_color(Color::rgb(1, 2, 3));
        assert_eq!(field.color(), Color::rgb(1, 2, 3));

        assert!(field.update_size(Size::new(10, 10)));
        assert!(field.grid().is_some());
    }
}
