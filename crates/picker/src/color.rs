use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PickerError, Result};

/// An 8-bit sRGB color, opaque unless built with [`Color::rgba`].
///
/// Serializes as its `#rrggbb` hex string, so alpha does not survive a serde round-trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A color in HSB (a.k.a. HSV) space, every component normalized to `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Hsb {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// The integer form of [`Hsb`] shown by the value editor: degrees and percents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HsvInts {
    /// Hue in degrees, `0..=360`
    pub h: u32,
    /// Saturation in percent, `0..=100`
    pub s: u32,
    /// Value (brightness) in percent, `0..=100`
    pub v: u32,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from normalized HSB components, see [`color_from_hsb`].
    pub fn from_hsb(h: f32, s: f32, v: f32) -> Self {
        color_from_hsb(h, s, v)
    }

    pub fn to_hsb(self) -> Hsb {
        rgb_to_hsb(self)
    }

    /// The HSB hue of this color, `0.0` for achromatic colors.
    pub fn hue(self) -> f32 {
        hue_of(self)
    }

    /// Returns true if the color carries no hue information (gray, black or white).
    pub fn is_achromatic(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// The hue of this color, or `fallback` when the color is achromatic and its RGB
    /// channels therefore say nothing about hue.
    pub fn hue_or(self, fallback: f32) -> f32 {
        if self.is_achromatic() {
            fallback
        } else {
            self.hue()
        }
    }

    pub fn to_hex(self) -> String {
        to_hex_string(self)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = PickerError;

    fn try_from(value: String) -> Result<Self> {
        parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        to_hex_string(color)
    }
}

impl Hsb {
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    pub fn to_color(self) -> Color {
        color_from_hsb(self.h, self.s, self.v)
    }
}

fn channel(value: f32) -> u8 {
    (value * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

/// The HSB hue of `color` in `0.0..1.0`, defined as `0.0` for achromatic colors.
pub fn hue_of(color: Color) -> f32 {
    rgb_to_hsb(color).h
}

/// Convert normalized HSB components to an opaque [`Color`].
///
/// The hue wraps at `1.0`, so `h = 1.0` yields the same color as `h = 0.0`.
/// Saturation and brightness are clamped to `0.0..=1.0`.
pub fn color_from_hsb(h: f32, s: f32, v: f32) -> Color {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    if s == 0.0 {
        let gray = channel(v);
        return Color::rgb(gray, gray, gray);
    }

    let h = (h - h.floor()) * 6.0;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match (h as u32) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Color::rgb(channel(r), channel(g), channel(b))
}

/// Convert a [`Color`] to normalized HSB, ignoring alpha.
pub fn rgb_to_hsb(color: Color) -> Hsb {
    let max = color.r.max(color.g).max(color.b);
    let min = color.r.min(color.g).min(color.b);

    let v = max as f32 / 255.0;
    if max == 0 || max == min {
        return Hsb { h: 0.0, s: 0.0, v };
    }

    let max_f = max as f32;
    let delta = (max - min) as f32;
    let s = delta / max_f;

    let red = (max_f - color.r as f32) / delta;
    let green = (max_f - color.g as f32) / delta;
    let blue = (max_f - color.b as f32) / delta;

    let sector = if color.r == max {
        blue - green
    } else if color.g == max {
        2.0 + red - blue
    } else {
        4.0 + green - red
    };
    let mut h = sector / 6.0;
    if h < 0.0 {
        h += 1.0;
    }

    Hsb { h, s, v }
}

/// Format `color` as lowercase `#rrggbb`, without alpha.
pub fn to_hex_string(color: Color) -> String {
    color.to_string()
}

/// Parse `#rrggbb` (hex digits in either case) into an opaque [`Color`].
///
/// Leading and trailing whitespace is ignored; the `#` is required.
pub fn parse_hex(input: &str) -> Result<Color> {
    let trimmed = input.trim();
    let Some(digits) = trimmed.strip_prefix('#') else {
        return Err(PickerError::parse(input, "color must start with #"));
    };

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PickerError::parse(input, "expected 6 hex digits (#rrggbb)"));
    }

    let parse = |range: std::ops::Range<usize>| -> Result<u8> {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| PickerError::parse(input, "invalid hex channel"))
    };

    Ok(Color::rgb(parse(0..2)?, parse(2..4)?, parse(4..6)?))
}

/// Quantize normalized HSB to whole degrees and percents (rounding to nearest).
///
/// This is a lossy boundary: converting back with [`hsv_ints_to_hsb`] is only close to
/// the input, never exact.
pub fn hsb_to_hsv_ints(hsb: Hsb) -> HsvInts {
    HsvInts {
        h: (hsb.h.clamp(0.0, 1.0) * 360.0).round() as u32,
        s: (hsb.s.clamp(0.0, 1.0) * 100.0).round() as u32,
        v: (hsb.v.clamp(0.0, 1.0) * 100.0).round() as u32,
    }
}

/// Convert degrees and percents back to normalized HSB.
pub fn hsv_ints_to_hsb(hsv: HsvInts) -> Result<Hsb> {
    check_range("hue", hsv.h, 360)?;
    check_range("saturation", hsv.s, 100)?;
    check_range("value", hsv.v, 100)?;

    Ok(Hsb {
        h: hsv.h as f32 / 360.0,
        s: hsv.s as f32 / 100.0,
        v: hsv.v as f32 / 100.0,
    })
}

pub(crate) fn check_range(channel: &'static str, value: u32, max: u32) -> Result<u32> {
    if value > max {
        return Err(PickerError::Range {
            channel,
            value,
            max,
        });
    }
    Ok(value)
}
