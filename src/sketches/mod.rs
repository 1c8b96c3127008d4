//! Sketches - each one draws a different animated piece frame by frame.

pub mod brushmap;
pub mod pendulum;
pub mod poster;
pub mod quadrants;
pub mod spin;
pub mod sprites;
pub mod tixy;

use crate::draw::Canvas;
use crate::error::{Result, SketchError};
use crate::nn::ModelKind;
use crate::stream::{FrameClock, FrameSettings};
use std::path::PathBuf;
use std::str::FromStr;

/// Trait for all animated sketches.
pub trait Sketch {
    /// Name of this sketch.
    fn name(&self) -> &'static str;

    /// Draw one frame. The canvas is in normalised device coordinates and
    /// still holds the previous frame's pixels.
    fn draw(&mut self, canvas: &mut Canvas, clock: &FrameClock) -> Result<()>;
}

/// Everything a sketch may need at construction time.
#[derive(Debug, Clone)]
pub struct SketchContext {
    pub seed: u64,
    pub model: ModelKind,
    pub depth: usize,
    pub image: Option<PathBuf>,
}

impl SketchContext {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            model: ModelKind::Dense,
            depth: 2,
            image: None,
        }
    }
}

/// The registry of raster sketches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchKind {
    Pendulum,
    Tixy,
    Spin,
    Quadrants,
    Sprites,
    Brushmap,
}

impl SketchKind {
    pub fn all() -> [SketchKind; 6] {
        [
            SketchKind::Pendulum,
            SketchKind::Tixy,
            SketchKind::Spin,
            SketchKind::Quadrants,
            SketchKind::Sprites,
            SketchKind::Brushmap,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SketchKind::Pendulum => "pendulum",
            SketchKind::Tixy => "tixy",
            SketchKind::Spin => "spin",
            SketchKind::Quadrants => "quadrants",
            SketchKind::Sprites => "sprites",
            SketchKind::Brushmap => "brushmap",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SketchKind::Pendulum => "mirrored harmonograph trails on space cadet",
            SketchKind::Tixy => "residual-network dot field in four mirrored quadrants",
            SketchKind::Spin => "rotating dot field driven by a random dense network",
            SketchKind::Quadrants => "framed pendulum groups beside an image mosaic",
            SketchKind::Sprites => "non-overlapping dots that breathe",
            SketchKind::Brushmap => "per-cell brushes sampled from a softmax map",
        }
    }

    /// The frame size, rate and length the sketch was composed for.
    pub fn defaults(&self) -> FrameSettings {
        match self {
            SketchKind::Quadrants => FrameSettings::new(1024, 1024, 15, 6),
            SketchKind::Brushmap => FrameSettings::new(256, 256, 1, 1),
            _ => FrameSettings::default(),
        }
    }

    pub fn build(&self, ctx: &SketchContext) -> Result<Box<dyn Sketch>> {
        Ok(match self {
            SketchKind::Pendulum => Box::new(pendulum::PendulumSketch::new(ctx.seed)),
            SketchKind::Tixy => Box::new(tixy::Tixy::new(ctx.seed)?),
            SketchKind::Spin => Box::new(spin::Spin::new(ctx.seed, ctx.model, ctx.depth)?),
            SketchKind::Quadrants => {
                let path = ctx
                    .image
                    .as_ref()
                    .ok_or(SketchError::MissingImage("quadrants"))?;
                let image = crate::draw::ImageBrush::open(path)?;
                Box::new(quadrants::Quadrants::new(ctx.seed, image))
            }
            SketchKind::Sprites => Box::new(sprites::Sprites::new(ctx.seed)),
            SketchKind::Brushmap => Box::new(brushmap::BrushMap::new(ctx.seed)?),
        })
    }
}

impl FromStr for SketchKind {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self> {
        SketchKind::all()
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SketchError::UnknownSketch(s.to_string()))
    }
}

/// Draw `f` four times, once per quadrant, each copy mirrored so the
/// quadrants reflect one another across the centre lines.
pub(crate) fn mirrored_quadrants(
    canvas: &mut Canvas,
    mut f: impl FnMut(&mut Canvas) -> Result<()>,
) -> Result<()> {
    const QUADRANTS: [(f64, f64, f64, f64); 4] = [
        (-0.5, -0.5, 1.0, 1.0),
        (0.5, -0.5, -1.0, 1.0),
        (-0.5, 0.5, 1.0, -1.0),
        (0.5, 0.5, -1.0, -1.0),
    ];
    for (tx, ty, sx, sy) in QUADRANTS {
        canvas.save();
        canvas.translate(tx, ty);
        canvas.scale(0.5, 0.5);
        canvas.scale(sx, sy);
        let drawn = f(canvas);
        canvas.restore();
        drawn?;
    }
    Ok(())
}

/// Inset the canvas to 0.95, stroke a frame around the inset, inset again.
pub(crate) fn framed_inset(canvas: &mut Canvas, color: crate::draw::Rgba) {
    canvas.scale(0.95, 0.95);
    canvas.stroke_rect(-1.0, -1.0, 2.0, 2.0, 2.0 / 256.0, color);
    canvas.scale(0.95, 0.95);
}

/// Render one small frame of a sketch; shared by the sketch tests.
#[cfg(test)]
pub(crate) fn draw_test_frame(sketch: &mut dyn Sketch, size: u32, frame: u64) -> Canvas {
    let settings = FrameSettings::new(size, size, 15, 6);
    let mut canvas = Canvas::new(size, size).unwrap();
    canvas.begin_frame();
    sketch.draw(&mut canvas, &settings.clock(frame)).unwrap();
    canvas
}
