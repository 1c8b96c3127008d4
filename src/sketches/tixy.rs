//! A tixy.land-style dot field where a random residual network stands in
//! for the usual one-line JavaScript function.
//!
//! Each dot feeds its position plus a clock vector through the network.
//! The latent vector picks the dot's radius (from features 2..4) and its
//! color (argmax of features 4..).

use super::{framed_inset, mirrored_quadrants, Sketch};
use crate::draw::{palette, Canvas, Point, Rgba};
use crate::error::Result;
use crate::nn::{self, tensor::argmax, Params, ResNet, Shape, Tensor};
use crate::seed;
use crate::stream::FrameClock;
use std::f64::consts::TAU;

const DIM: usize = 6;
const CLOCK_FREQUENCIES: [f64; 3] = [1.0, 1.0 / 3.0, 1.0 / 2.0];
const MAX_LENGTH: f64 = 5.0;
const PALETTE: [Rgba; 2] = [palette::SUPER_PINK, palette::WHITE];

pub struct Tixy {
    model: ResNet,
    params: Params,
    rows: usize,
    cols: usize,
}

impl Tixy {
    pub fn new(seed: u64) -> Result<Self> {
        let model = ResNet { depth: 2 };
        let params = nn::init(&model, Shape::new(1, DIM), &mut seed::rng(seed, "tixy"))?;
        Ok(Self {
            model,
            params,
            rows: 16,
            cols: 16,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Sine and cosine of `t` at each clock frequency.
    fn clock(t: f64) -> Tensor {
        let values: Vec<f64> = CLOCK_FREQUENCIES
            .iter()
            .flat_map(|f| [(t * f * TAU).sin(), (t * f * TAU).cos()])
            .collect();
        Tensor::row(&values)
    }

    /// Radius factor in `[0, 1]` from the length of latent features 2..4.
    fn dot_factor(latent: &[f64]) -> f64 {
        let length = latent[2].hypot(latent[3]);
        length.min(MAX_LENGTH) / MAX_LENGTH
    }

    fn color(latent: &[f64]) -> Rgba {
        PALETTE[argmax(&latent[4..]) % PALETTE.len()]
    }

    fn draw_field(&self, canvas: &mut Canvas, time: &Tensor) -> Result<()> {
        let max_radius = 2.0 / self.rows as f64 / 2.0;
        for row in 0..self.rows {
            let ndc_y = 2.0 * (row as f64 / self.rows as f64) - 1.0 + max_radius;
            for col in 0..self.cols {
                let ndc_x = 2.0 * (col as f64 / self.cols as f64) - 1.0 + max_radius;
                let position = Tensor::row(&[ndc_x, ndc_y, 0.0, 0.0, 0.0, 0.0]);
                let latent = nn::eval(&self.model, &self.params, position.add(time)?)?;
                let latent = latent.as_slice();
                let radius = Self::dot_factor(latent) * max_radius;
                canvas.fill_circle(Point::new(ndc_x, ndc_y), radius, Self::color(latent));
            }
        }
        Ok(())
    }
}

impl Sketch for Tixy {
    fn name(&self) -> &'static str {
        "tixy"
    }

    fn draw(&mut self, canvas: &mut Canvas, clock: &FrameClock) -> Result<()> {
        let time = Self::clock(clock.time());
        canvas.paint(palette::SPACE_CADET);
        canvas.scoped(|canvas| {
            framed_inset(canvas, palette::WHITE);
            mirrored_quadrants(canvas, |canvas| self.draw_field(canvas, &time))
        })
    }
}
