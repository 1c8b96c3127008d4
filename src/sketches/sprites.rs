//! Dots that never overlap. A large dot anchors the centre and a fixed set
//! of seeded candidates breathe around it; a candidate that would touch an
//! earlier dot is skipped for that frame.

use super::Sketch;
use crate::draw::{palette, Brush, Canvas, Circle, FramedBrush, Point, SpriteField};
use crate::error::Result;
use crate::seed;
use crate::stream::FrameClock;
use rand::Rng;
use std::f64::consts::TAU;

const CENTER_RADIUS: f64 = 2.0 / 16.0;

pub struct Sprites {
    seed: u64,
    brush: FramedBrush,
    field: SpriteField,
    candidates: usize,
}

impl Sprites {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            brush: FramedBrush::new(palette::BLACK, palette::WHITE),
            field: SpriteField::new(2.0 / 32.0),
            candidates: 160,
        }
    }

    /// Circles placed in the last drawn frame.
    pub fn placed(&self) -> &[Circle] {
        self.field.circles()
    }

    fn draw_dot(&mut self, canvas: &mut Canvas, circle: Circle) {
        if self.field.try_place(circle) {
            self.brush.dot(canvas, circle.center, circle.radius);
        }
    }
}

impl Sketch for Sprites {
    fn name(&self) -> &'static str {
        "sprites"
    }

    fn draw(&mut self, canvas: &mut Canvas, clock: &FrameClock) -> Result<()> {
        self.field.clear();
        self.brush.clear(canvas);
        self.draw_dot(canvas, Circle::new(Point::ORIGIN, CENTER_RADIUS));

        // the same candidates every frame, only their radii move
        let mut rng = seed::rng(self.seed, "sprites");
        let breath = TAU * clock.progress();
        for _ in 0..self.candidates {
            let center = Point::new(rng.gen_range(-0.9..0.9), rng.gen_range(-0.9..0.9));
            let base = rng.gen_range(0.01..0.06);
            let phase = rng.gen_range(0.0..TAU);
            let radius = base * (0.75 + 0.25 * (breath + phase).sin());
            self.draw_dot(canvas, Circle::new(center, radius));
        }
        Ok(())
    }
}
