//! Brushes decide how dots and boxes turn into pixels.
//!
//! Sketches switch brushes between shapes to flip a quadrant from dark to
//! light, or to replace flat color with colors sampled from an image.

use super::canvas::Canvas;
use super::color::Rgba;
use super::Point;
use crate::error::Result;
use image::RgbaImage;
use std::path::Path;

pub trait Brush {
    /// Reset the whole surface. Brushes without a background leave it alone.
    fn clear(&self, _canvas: &mut Canvas) {}

    /// Draw a dot of `radius` at `center`.
    fn dot(&self, canvas: &mut Canvas, center: Point, radius: f64);

    /// Draw a box of `size` centred on `center`.
    fn rect(&self, _canvas: &mut Canvas, _center: Point, _size: Point) {}
}

/// Flat colors: one background, dots in the first foreground color and
/// boxes in the second.
#[derive(Debug, Clone)]
pub struct BasicBrush {
    pub background: Rgba,
    pub foreground: Vec<Rgba>,
}

impl BasicBrush {
    pub fn new(background: Rgba, foreground: Vec<Rgba>) -> Self {
        Self {
            background,
            foreground,
        }
    }

    fn foreground(&self, index: usize) -> Rgba {
        self.foreground
            .get(index)
            .or_else(|| self.foreground.first())
            .copied()
            .unwrap_or(self.background)
    }
}

impl Brush for BasicBrush {
    fn clear(&self, canvas: &mut Canvas) {
        canvas.paint(self.background);
    }

    fn dot(&self, canvas: &mut Canvas, center: Point, radius: f64) {
        canvas.fill_circle(center, radius, self.foreground(0));
    }

    fn rect(&self, canvas: &mut Canvas, center: Point, size: Point) {
        canvas.fill_rect(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
            self.foreground(1),
        );
    }
}

/// Like [`BasicBrush`], but clearing also strokes a thin frame inset to 0.95.
#[derive(Debug, Clone)]
pub struct FramedBrush {
    pub background: Rgba,
    pub foreground: Rgba,
}

impl FramedBrush {
    pub const INSET: f64 = 0.95;
    pub const LINE_WIDTH: f64 = 2.0 / 256.0;

    pub fn new(background: Rgba, foreground: Rgba) -> Self {
        Self {
            background,
            foreground,
        }
    }
}

impl Brush for FramedBrush {
    fn clear(&self, canvas: &mut Canvas) {
        canvas.paint(self.background);
        let inset = Self::INSET;
        canvas.stroke_rect(
            -inset,
            -inset,
            2.0 * inset,
            2.0 * inset,
            Self::LINE_WIDTH,
            self.foreground,
        );
    }

    fn dot(&self, canvas: &mut Canvas, center: Point, radius: f64) {
        canvas.fill_circle(center, radius, self.foreground);
    }
}

/// Paints squares in the color of an image sampled at the same NDC spot.
pub struct ImageBrush {
    image: RgbaImage,
}

impl ImageBrush {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path)?.to_rgba8();
        Ok(Self::new(image))
    }

    /// Color of the image under an NDC position, clamped to the edges.
    pub fn sample(&self, position: Point) -> Rgba {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return Rgba::new(0.0, 0.0, 0.0, 0.0);
        }
        let x = texel(position.x, w);
        let y = texel(position.y, h);
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Rgba::from_rgba8(r, g, b, a)
    }
}

fn texel(ndc: f64, size: u32) -> u32 {
    let t = ((ndc + 1.0) * 0.5 * size as f64).floor();
    if t.is_nan() || t < 0.0 {
        0
    } else {
        (t as u32).min(size - 1)
    }
}

impl Brush for ImageBrush {
    /// Squares anchor at their top-left corner with side `2 * radius`.
    fn dot(&self, canvas: &mut Canvas, center: Point, radius: f64) {
        let color = self.sample(center);
        canvas.fill_rect(center.x, center.y, 2.0 * radius, 2.0 * radius, color);
    }
}
