//! A slowly turning field of dots whose size and color come from a random
//! network. Dots far from the centre spin faster as time goes on.

use super::{framed_inset, mirrored_quadrants, Sketch};
use crate::draw::{palette, Canvas, Point, Rgba};
use crate::error::Result;
use crate::nn::{self, tensor::argmax, Model, ModelKind, Params, Shape, Tensor};
use crate::seed;
use crate::stream::FrameClock;
use std::f64::consts::TAU;

/// Two position features, one radius feature, two color logits.
const DIM: usize = 2 + 1 + 2;
const CLOCK_FREQUENCIES: [f64; 3] = [1.0, 1.0 / 3.0, 1.0 / 2.0];
const PALETTE: [Rgba; 2] = [palette::SUPER_PINK, palette::WHITE];

pub struct Spin {
    model: Box<dyn Model>,
    params: Params,
    rows: usize,
    cols: usize,
}

impl Spin {
    pub fn new(seed: u64, kind: ModelKind, depth: usize) -> Result<Self> {
        let model = kind.build(depth);
        let params = nn::init(model.as_ref(), Shape::new(1, DIM), &mut seed::rng(seed, "spin"))?;
        Ok(Self {
            model,
            params,
            rows: 8,
            cols: 8,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Five clock features: sin and cos at the first two frequencies, sin
    /// at the third.
    fn clock(t: f64) -> Tensor {
        let [f0, f1, f2] = CLOCK_FREQUENCIES;
        Tensor::row(&[
            (t * f0 * TAU).sin(),
            (t * f0 * TAU).cos(),
            (t * f1 * TAU).sin(),
            (t * f1 * TAU).cos(),
            (t * f2 * TAU).sin(),
        ])
    }

    fn radius_factor(latent: &[f64]) -> f64 {
        (-latent[2].abs()).exp()
    }

    fn color(latent: &[f64]) -> Rgba {
        PALETTE[argmax(&latent[3..]) % PALETTE.len()]
    }

    fn draw_field(&self, canvas: &mut Canvas, t: f64) -> Result<()> {
        let time = Self::clock(t);
        let max_radius = 2.0 / self.rows as f64 / 2.0;
        for row in 0..self.rows {
            let ndc_y = 2.0 * (row as f64 / self.rows as f64) - 1.0 + max_radius;
            for col in 0..self.cols {
                let ndc_x = 2.0 * (col as f64 / self.cols as f64) - 1.0 + max_radius;
                let dist = ndc_x.hypot(ndc_y).min(1.0);
                let source = Tensor::row(&[ndc_x, ndc_y, 0.0, 0.0, 0.0]);
                let target = nn::eval(self.model.as_ref(), &self.params, source.add(&time)?)?;
                let target = target.as_slice();
                let radius = max_radius * Self::radius_factor(target);
                let color = Self::color(target);
                canvas.scoped(|canvas| {
                    canvas.rotate(TAU * t.powf(dist));
                    canvas.fill_circle(Point::new(ndc_x, ndc_y), radius, color);
                });
            }
        }
        Ok(())
    }
}

impl Sketch for Spin {
    fn name(&self) -> &'static str {
        "spin"
    }

    fn draw(&mut self, canvas: &mut Canvas, clock: &FrameClock) -> Result<()> {
        let t = clock.time();
        canvas.paint(palette::BLACK);
        canvas.scoped(|canvas| {
            framed_inset(canvas, palette::WHITE);
            canvas.rotate(TAU * clock.progress());
            mirrored_quadrants(canvas, |canvas| self.draw_field(canvas, t))
        })
    }
}
