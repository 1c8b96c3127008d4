//! Colors and the shared palette.

use crate::error::{Result, SketchError};
use std::fmt;

/// Straight (non-premultiplied) RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// The named colors every sketch draws from.
pub mod palette {
    use super::Rgba;

    pub const SPACE_CADET: Rgba = Rgba::rgb(0.160, 0.160, 0.239);
    pub const SUPER_PINK: Rgba = Rgba::rgb(0.839, 0.360, 0.678);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const PASTEL_PINK: Rgba = Rgba::rgb(232.0 / 255.0, 158.0 / 255.0, 159.0 / 255.0);
    pub const SLATE: Rgba = Rgba::rgb(49.0 / 255.0, 57.0 / 255.0, 60.0 / 255.0);
    pub const BLUSH: Rgba = Rgba::rgb(237.0 / 255.0, 227.0 / 255.0, 228.0 / 255.0);
    pub const TEAL: Rgba = Rgba::rgb(43.0 / 255.0, 135.0 / 255.0, 158.0 / 255.0);
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0,
            a as f64 / 255.0,
        )
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let byte = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| SketchError::Shape(format!("bad hex color {hex:?}")))
        };
        match digits.len() {
            6 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(SketchError::Shape(format!("bad hex color {hex:?}"))),
        }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Largest per-channel difference, alpha included.
    pub fn distance(self, other: Rgba) -> f64 {
        [
            self.r - other.r,
            self.g - other.g,
            self.b - other.b,
            self.a - other.a,
        ]
        .into_iter()
        .fold(0.0, |acc: f64, d| acc.max(d.abs()))
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba(
            clamp_unit(self.r),
            clamp_unit(self.g),
            clamp_unit(self.b),
            clamp_unit(self.a),
        )
        .unwrap_or(tiny_skia::Color::BLACK)
    }

    fn channel8(v: f64) -> u8 {
        (clamp_unit(v) as f64 * 255.0).round() as u8
    }
}

fn clamp_unit(v: f64) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0) as f32
    }
}

/// Formats as `#rrggbb`, the form SVG attributes expect. Alpha is dropped.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            Self::channel8(self.r),
            Self::channel8(self.g),
            Self::channel8(self.b)
        )
    }
}
