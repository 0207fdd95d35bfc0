use std::fmt::{self, Display, Formatter};

use enum_iterator::Sequence;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::color::{Color, Hsb, HsvInts, check_range, hsb_to_hsv_ints, hsv_ints_to_hsb, parse_hex};
use crate::error::{PickerError, Result};

/// The text representation the value editor renders.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ValueMode {
    #[default]
    Rgb,
    Hex,
    Hsv,
}

impl ValueMode {
    /// The next mode of the `Rgb -> Hex -> Hsv -> Rgb` cycle.
    pub fn next(self) -> Self {
        enum_iterator::next_cycle(&self)
    }

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Rgb => &["R", "G", "B"],
            Self::Hex => &["HEX"],
            Self::Hsv => &["H", "S", "V"],
        }
    }

    pub fn field_count(self) -> usize {
        self.labels().len()
    }

    /// Maximum characters a field accepts in this mode.
    pub fn max_len(self) -> usize {
        match self {
            Self::Rgb | Self::Hsv => 3,
            Self::Hex => 7,
        }
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Hex)
    }

    /// The keystroke filter: numeric fields take up to 3 digits, the hex field up to 7
    /// characters. Empty text always passes.
    pub fn accepts(self, text: &str) -> bool {
        if text.chars().count() > self.max_len() {
            return false;
        }
        !self.is_numeric() || text.chars().all(|c| c.is_ascii_digit())
    }
}

impl Display for ValueMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Rgb => "RGB",
            Self::Hex => "HEX",
            Self::Hsv => "HSV",
        };
        f.write_str(label)
    }
}

/// Whether a text change was typed by the user or written back by the picker itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateSource {
    Programmatic,
    User,
}

/// A committed edit of the value editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueChange {
    pub color: Color,
    pub hue: f32,
}

pub type FieldTexts = SmallVec<[String; 3]>;

/// Numeric and hex text fields for the current color.
///
/// The fields are a rendering of `(color, hue)`. Every accepted user keystroke that
/// changes a field is parsed back and, if valid, reported as a [`ValueChange`].
#[derive(Clone, Debug)]
pub struct ValueEditorController {
    mode: ValueMode,
    color: Color,
    hue: f32,
    fields: FieldTexts,
    external_updates: usize,
}

impl ValueEditorController {
    pub fn new(color: Color, hue: f32) -> Self {
        let mut this = Self {
            mode: ValueMode::default(),
            color,
            hue: hue.clamp(0.0, 1.0),
            fields: FieldTexts::new(),
            external_updates: 0,
        };
        this.render();
        this
    }

    /// Set the initial mode.
    pub fn mode(mut self, mode: ValueMode) -> Self {
        self.mode = mode;
        self.render();
        self
    }

    pub fn value_mode(&self) -> ValueMode {
        self.mode
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn external_updates(&self) -> usize {
        self.external_updates
    }

    /// Re-render every field from `color` and `hue`. Never reports a change.
    pub fn update_values(&mut self, color: Color, hue: f32) {
        self.external_updates += 1;
        self.color = color;
        self.hue = hue.clamp(0.0, 1.0);
        self.render();
    }

    pub fn switch_mode(&mut self, mode: ValueMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.render();
        tracing::trace!(%mode, "value editor mode switched");
    }

    /// Advance to the next mode and return it.
    pub fn cycle_mode(&mut self) -> ValueMode {
        self.switch_mode(self.mode.next());
        self.mode
    }

    /// Handle new text in the field at `index`.
    ///
    /// Text the mode's filter rejects is refused with [`PickerError::Validation`] and the
    /// field keeps its content. Accepted text is stored; if it came from the user and
    /// parses to a different value, the new value is returned. Text that does not parse
    /// is kept in the field but produces no change.
    pub fn on_text_changed(
        &mut self,
        index: usize,
        text: &str,
        source: UpdateSource,
    ) -> Result<Option<ValueChange>> {
        if index >= self.fields.len() || !self.mode.accepts(text) {
            return Err(PickerError::Validation {
                input: text.to_string(),
                mode: self.mode,
            });
        }

        if self.fields[index] == text {
            return Ok(None);
        }
        self.fields[index] = text.to_string();

        if source == UpdateSource::Programmatic {
            return Ok(None);
        }

        let (color, hue) = match self.parse_fields() {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(%err, "value edit ignored");
                return Ok(None);
            }
        };

        if color == self.color && hue == self.hue {
            return Ok(None);
        }

        self.color = color;
        self.hue = hue;
        tracing::trace!(%color, hue, "value edit committed");
        Ok(Some(ValueChange { color, hue }))
    }

    /// Focus left the field at `index`: an empty numeric field is filled with `"0"` and
    /// committed.
    pub fn blur_field(&mut self, index: usize) -> Option<ValueChange> {
        if !self.mode.is_numeric() || self.field(index) != Some("") {
            return None;
        }

        self.on_text_changed(index, "0", UpdateSource::User)
            .ok()
            .flatten()
    }

    fn render(&mut self) {
        let color = self.color;
        self.fields = match self.mode {
            ValueMode::Rgb => [color.r, color.g, color.b]
                .iter()
                .map(u8::to_string)
                .collect(),
            ValueMode::Hex => std::iter::once(color.to_hex()).collect(),
            ValueMode::Hsv => {
                let hsb = color.to_hsb();
                let HsvInts { h, s, v } = hsb_to_hsv_ints(Hsb::new(self.hue, hsb.s, hsb.v));
                [h, s, v].iter().map(u32::to_string).collect()
            }
        };
    }

    fn parse_fields(&self) -> Result<(Color, f32)> {
        match self.mode {
            ValueMode::Rgb => {
                let r = parse_channel("red", &self.fields[0], 255)?;
                let g = parse_channel("green", &self.fields[1], 255)?;
                let b = parse_channel("blue", &self.fields[2], 255)?;
                let color = Color::rgb(r as u8, g as u8, b as u8);
                Ok((color, color.hue_or(self.hue)))
            }
            ValueMode::Hex => {
                let color = parse_hex(&self.fields[0])?;
                Ok((color, color.hue_or(self.hue)))
            }
            ValueMode::Hsv => {
                let hsb = hsv_ints_to_hsb(HsvInts {
                    h: parse_channel("hue", &self.fields[0], 360)?,
                    s: parse_channel("saturation", &self.fields[1], 100)?,
                    v: parse_channel("value", &self.fields[2], 100)?,
                })?;
                Ok((hsb.to_color(), hsb.h))
            }
        }
    }
}

fn parse_channel(channel: &'static str, text: &str, max: u32) -> Result<u32> {
    let value = text
        .parse::<u32>()
        .map_err(|_| PickerError::parse(text, "expected a whole number"))?;
    check_range(channel, value, max)
}
