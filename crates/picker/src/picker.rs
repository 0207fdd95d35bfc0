use std::time::Duration;

use instant::Instant;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;
use crate::field::{FieldController, FieldEvent};
use crate::geometry::Size;
use crate::palette::{OverflowPolicy, PaletteCapacity, PaletteClick, PaletteStore, SharedPalette};
use crate::pointer::DEFAULT_REGEN_INTERVAL;
use crate::slider::{SliderChange, SliderController};
use crate::values::{UpdateSource, ValueChange, ValueEditorController, ValueMode};


/// Construction parameters of a [`ColorPicker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PickerOptions {
    /// The selected color, as `#rrggbb`.
    #[schemars(with = "String")]
    pub initial_color: Color,
    /// Maximum number of palette entries, `-1` for unbounded.
    pub max_palette_colors: i32,
    pub palette_policy: OverflowPolicy,
    /// Colors the palette starts with, after those of a shared palette.
    #[schemars(with = "Vec<String>")]
    pub palette_colors: Vec<Color>,
    pub show_preview: bool,
    pub show_values: bool,
    pub show_palette: bool,
    pub value_mode: ValueMode,
    pub field_size: Size,
    pub slider_size: Size,
    /// Minimum milliseconds between two hue-driven field regenerations.
    pub regen_interval_ms: u64,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            initial_color: Color::RED,
            max_palette_colors: 30,
            palette_policy: OverflowPolicy::default(),
            palette_colors: Vec::new(),
            show_preview: true,
            show_values: true,
            show_palette: true,
            value_mode: ValueMode::default(),
            field_size: Size::new(256, 256),
            slider_size: Size::new(256, 25),
            regen_interval_ms: DEFAULT_REGEN_INTERVAL.as_millis() as u64,
        }
    }
}

/// The optional panels around the field and the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Panels {
    pub preview: bool,
    pub values: bool,
    pub palette: bool,
}

/// The swatch showing the selected color. Clicking it saves the color to the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSwatch {
    color: Color,
    can_add: bool,
}

impl PreviewSwatch {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            can_add: true,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn can_add(&self) -> bool {
        self.can_add
    }

    pub fn set_can_add(&mut self, can_add: bool) {
        self.can_add = can_add;
    }
}

/// Where a color change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    Field,
    Slider,
    Values,
    Palette,
    External,
}

type ColorListener = Box<dyn FnMut(Color)>;

/// A color picker: saturation/brightness field, hue slider, value editor, preview swatch
/// and palette kept in sync around one selected color and hue.
///
/// Every change enters through one of the `*_changed` methods (or the pointer and text
/// routing that calls them), is pushed to every part except the one it came from, and
/// notifies the color listeners once.
pub struct ColorPicker {
    color: Color,
    hue: f32,
    field: FieldController,
    slider: SliderController,
    values: ValueEditorController,
    preview: PreviewSwatch,
    palette: PaletteStore,
    panels: Panels,
    listeners: Vec<ColorListener>,
}

impl ColorPicker {
    /// Create a picker, seeding the palette from `shared` and writing back to it when
    /// given.
    pub fn new(options: PickerOptions, shared: Option<SharedPalette>) -> Result<Self> {
        let capacity = PaletteCapacity::try_from(options.max_palette_colors)?;
        let mut palette = match shared {
            Some(shared) => PaletteStore::with_shared(capacity, options.palette_policy, shared),
            None => PaletteStore::new(capacity, options.palette_policy),
        };
        palette.add(options.palette_colors);

        let color = options.initial_color;
        let hue = color.hue();
        let field = FieldController::with_hue(options.field_size, color, hue)
            .regen_interval(Duration::from_millis(options.regen_interval_ms));

        tracing::debug!(
            %color,
            ?capacity,
            shared = palette.shared().is_some(),
            "new color picker"
        );
        Ok(Self {
            color,
            hue,
            field,
            slider: SliderController::new(options.slider_size, hue),
            values: ValueEditorController::new(color, hue).mode(options.value_mode),
            preview: PreviewSwatch::new(color),
            palette,
            panels: Panels {
                preview: options.show_preview,
                values: options.show_values,
                palette: options.show_palette,
            },
            listeners: Vec::new(),
        })
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn field(&self) -> &FieldController {
        &self.field
    }

    pub fn slider(&self) -> &SliderController {
        &self.slider
    }

    pub fn values(&self) -> &ValueEditorController {
        &self.values
    }

    pub fn preview(&self) -> &PreviewSwatch {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut PreviewSwatch {
        &mut self.preview
    }

    pub fn palette(&self) -> &PaletteStore {
        &self.palette
    }

    pub fn palette_colors(&self) -> Vec<Color> {
        self.palette.colors_snapshot()
    }

    pub fn panels(&self) -> Panels {
        self.panels
    }

    /// Call `listener` with the new color after every change.
    pub fn add_color_listener(&mut self, listener: impl FnMut(Color) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Show or hide the optional panels. The selected color and hue are kept.
    pub fn set_panels_enabled(&mut self, preview: bool, values: bool, palette: bool) {
        self.panels = Panels {
            preview,
            values,
            palette,
        };
        self.values.update_values(self.color, self.hue);
        self.preview.set_color(self.color);
    }

    pub fn set_max_palette_items(&mut self, max: i32) -> Result<()> {
        self.palette.set_capacity(PaletteCapacity::try_from(max)?);
        Ok(())
    }

    pub fn set_palette_policy(&mut self, policy: OverflowPolicy) {
        self.palette.set_policy(policy);
    }

    /// Select `color`. Without `hue` the hue of the color is used, or the current hue if
    /// the color is achromatic.
    pub fn set_selected_color(&mut self, color: Color, hue: Option<f32>) {
        self.color = color;
        self.hue = hue.unwrap_or_else(|| color.hue_or(self.hue)).clamp(0.0, 1.0);
        self.fan_out(ChangeOrigin::External, Instant::now());
    }

    /// The field marker moved to `color`. The hue is unchanged.
    pub fn color_field_changed(&mut self, color: Color) {
        self.color = color;
        self.fan_out(ChangeOrigin::Field, Instant::now());
    }

    /// The hue slider moved.
    pub fn hue_slider_changed(&mut self, change: SliderChange) {
        self.hue_slider_changed_at(change, Instant::now());
    }

    pub fn hue_slider_changed_at(&mut self, change: SliderChange, now: Instant) {
        self.hue = change.hue;
        self.field.set_hue_at(change.hue, now);
        self.color = self.field.color();
        self.fan_out(ChangeOrigin::Slider, now);
    }

    /// The value editor committed an edit.
    pub fn value_editor_changed(&mut self, change: ValueChange) {
        self.value_editor_changed_at(change, Instant::now());
    }

    pub fn value_editor_changed_at(&mut self, change: ValueChange, now: Instant) {
        self.color = change.color;
        self.hue = change.hue;
        self.fan_out(ChangeOrigin::Values, now);
    }

    /// A palette entry was clicked. Nothing happens if the entry changed since.
    pub fn palette_item_clicked(&mut self, click: PaletteClick) {
        self.palette_item_clicked_at(click, Instant::now());
    }

    pub fn palette_item_clicked_at(&mut self, click: PaletteClick, now: Instant) {
        if let Some(color) = self.palette.resolve(click) {
            self.color = color;
            self.hue = color.hue_or(self.hue);
            self.fan_out(ChangeOrigin::Palette, now);
        }
        self.field.flush_pending(now);
    }

    /// Click on the palette entry at `index`.
    pub fn click_palette_item(&mut self, index: usize) {
        if let Some(click) = self.palette.item_clicked(index) {
            self.palette_item_clicked(click);
        }
    }

    /// The preview swatch was clicked: save its color to the palette.
    ///
    /// Returns true if the palette stored the color.
    pub fn preview_swatch_clicked(&mut self) -> bool {
        self.preview_swatch_clicked_at(Instant::now())
    }

    pub fn preview_swatch_clicked_at(&mut self, now: Instant) -> bool {
        self.field.flush_pending(now);
        if !self.panels.preview || !self.preview.can_add() {
            return false;
        }

        let color = self.preview.color();
        let stored = self.palette.push(color);
        tracing::trace!(%color, stored, len = self.palette.len(), "preview added to palette");
        stored
    }

    pub fn field_pointer_down(&mut self, x: i32, y: i32) {
        self.field_pointer_down_at(x, y, Instant::now());
    }

    pub fn field_pointer_down_at(&mut self, x: i32, y: i32, now: Instant) {
        let FieldEvent::Change(color) = self.field.pointer_down_at(x, y, now);
        self.color_field_changed(color);
    }

    pub fn field_pointer_move(&mut self, x: i32, y: i32) {
        self.field_pointer_move_at(x, y, Instant::now());
    }

    pub fn field_pointer_move_at(&mut self, x: i32, y: i32, now: Instant) {
        if let Some(FieldEvent::Change(color)) = self.field.pointer_move_at(x, y, now) {
            self.color_field_changed(color);
        }
    }

    pub fn field_pointer_up(&mut self) {
        self.field_pointer_up_at(Instant::now());
    }

    pub fn field_pointer_up_at(&mut self, now: Instant) {
        self.field.flush_pending(now);
        self.field.pointer_up();
    }

    pub fn slider_pointer_down(&mut self, x: i32, y: i32) {
        self.slider_pointer_down_at(x, y, Instant::now());
    }

    pub fn slider_pointer_down_at(&mut self, x: i32, y: i32, now: Instant) {
        let change = self.slider.pointer_down(x, y);
        self.hue_slider_changed_at(change, now);
    }

    pub fn slider_pointer_move(&mut self, x: i32, y: i32) {
        self.slider_pointer_move_at(x, y, Instant::now());
    }

    pub fn slider_pointer_move_at(&mut self, x: i32, y: i32, now: Instant) {
        if let Some(change) = self.slider.pointer_move(x, y) {
            self.hue_slider_changed_at(change, now);
        }
    }

    pub fn slider_pointer_up(&mut self) {
        self.slider_pointer_up_at(Instant::now());
    }

    pub fn slider_pointer_up_at(&mut self, now: Instant) {
        self.field.flush_pending(now);
        self.slider.pointer_up();
    }

    /// The user typed `text` into the value field at `index`.
    ///
    /// Keystrokes the current mode does not accept are returned as an error and leave
    /// everything unchanged.
    pub fn value_text_changed(&mut self, index: usize, text: &str) -> Result<()> {
        self.value_text_changed_at(index, text, Instant::now())
    }

    pub fn value_text_changed_at(&mut self, index: usize, text: &str, now: Instant) -> Result<()> {
        let change = self.values.on_text_changed(index, text, UpdateSource::User);
        if let Ok(Some(change)) = change {
            self.value_editor_changed_at(change, now);
        }
        self.field.flush_pending(now);
        change.map(|_| ())
    }

    pub fn value_field_blurred(&mut self, index: usize) {
        self.value_field_blurred_at(index, Instant::now());
    }

    pub fn value_field_blurred_at(&mut self, index: usize, now: Instant) {
        if let Some(change) = self.values.blur_field(index) {
            self.value_editor_changed_at(change, now);
        }
        self.field.flush_pending(now);
    }

    pub fn cycle_value_mode(&mut self) -> ValueMode {
        self.field.flush_pending(Instant::now());
        self.values.cycle_mode()
    }

    /// Re-run a field regeneration the throttle deferred, if its interval has passed.
    pub fn flush_pending(&mut self, now: Instant) -> bool {
        self.field.flush_pending(now)
    }

    /// Resize the field and the slider, keeping the selected color and hue.
    pub fn resize(&mut self, field_size: Size, slider_size: Size) {
        self.field.update_size(field_size);
        self.field.reposition(self.color);
        self.slider.update_size(slider_size);
        tracing::debug!(?field_size, ?slider_size, "color picker resized");
    }

    fn fan_out(&mut self, origin: ChangeOrigin, now: Instant) {
        let (color, hue) = (self.color, self.hue);

        if matches!(
            origin,
            ChangeOrigin::Values | ChangeOrigin::Palette | ChangeOrigin::External
        ) {
            if self.field.hue() != hue {
                self.field.set_hue_at(hue, now);
            }
            self.field.set_selected_color(color);
            self.slider.set_selected_hue(hue);
        }
        self.field.flush_pending(now);
        if origin != ChangeOrigin::Values {
            self.values.update_values(color, hue);
        }
        self.preview.set_color(color);

        tracing::trace!(?origin, %color, hue, "color changed");
        for listener in &mut self.listeners {
            listener(color);
        }
    }
}
