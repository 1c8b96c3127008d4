//! Four framed panels: two carry mirrored pendulum trails, two carry a
//! mosaic of an image, the second of them turned upside down.

use super::pendulum::{mirror_passes, Pendulum, FREQUENCIES};
use super::Sketch;
use crate::draw::{palette, BasicBrush, Brush, Canvas, ImageBrush, Point};
use crate::error::Result;
use crate::seed;
use crate::stream::FrameClock;

/// Panel edge relative to its frame.
const PANEL_INSET: f64 = 0.98;

pub struct Quadrants {
    pendulum: Pendulum,
    image: ImageBrush,
    pen_dark: BasicBrush,
    pen_light: BasicBrush,
    samples: usize,
    window: f64,
    radius: f64,
    mosaic: usize,
}

impl Quadrants {
    pub fn new(seed: u64, image: ImageBrush) -> Self {
        let phases: Vec<f64> = (0..200).map(|k| k as f64 / 100.0).collect();
        let mut rng = seed::rng(seed, "quadrants");
        Self {
            pendulum: Pendulum::random(&mut rng, 4, &FREQUENCIES, &phases),
            image,
            pen_dark: BasicBrush::new(palette::BLACK, vec![palette::SUPER_PINK, palette::WHITE]),
            pen_light: BasicBrush::new(palette::WHITE, vec![palette::SUPER_PINK, palette::BLACK]),
            samples: 128,
            window: 0.5,
            radius: 2.0 / 128.0,
            mosaic: 64,
        }
    }

    pub fn pendulum(&self) -> &Pendulum {
        &self.pendulum
    }

    /// A full-size box in `outer` with a slightly smaller one in `inner`.
    fn panel(canvas: &mut Canvas, outer: &BasicBrush, inner: &BasicBrush) {
        let size = Point::new(2.0, 2.0);
        outer.rect(canvas, Point::ORIGIN, size);
        canvas.scale(PANEL_INSET, PANEL_INSET);
        inner.rect(canvas, Point::ORIGIN, size);
    }

    fn draw_pendulum_group(&self, canvas: &mut Canvas, t: f64) {
        let trail = self.pendulum.trail(t, self.samples, self.window);
        mirror_passes(canvas, |canvas| {
            for &p in &trail {
                self.pen_light.dot(canvas, p, self.radius);
            }
        });
    }

    fn draw_mosaic(&self, canvas: &mut Canvas) {
        let n = self.mosaic as f64;
        let radius = 2.0 / n / 2.0;
        for row in 0..self.mosaic {
            let y = row as f64 / n * 2.0 - 1.0;
            for col in 0..self.mosaic {
                let x = col as f64 / n * 2.0 - 1.0;
                self.image.dot(canvas, Point::new(x, y), radius);
            }
        }
    }
}

impl Sketch for Quadrants {
    fn name(&self) -> &'static str {
        "quadrants"
    }

    fn draw(&mut self, canvas: &mut Canvas, clock: &FrameClock) -> Result<()> {
        let t = clock.time();
        self.pen_dark.clear(canvas);

        for (x, y) in [(-0.5, -0.5), (0.5, 0.5)] {
            canvas.scoped(|canvas| {
                canvas.translate(x, y);
                canvas.scale(0.5, 0.5);
                Self::panel(canvas, &self.pen_dark, &self.pen_light);
                self.draw_pendulum_group(canvas, t);
            });
        }

        for (x, y, flip) in [(-0.5, 0.5, 1.0), (0.5, -0.5, -1.0)] {
            canvas.scoped(|canvas| {
                canvas.translate(x, y);
                canvas.scale(0.5, 0.5);
                canvas.scale(flip, flip);
                Self::panel(canvas, &self.pen_light, &self.pen_dark);
                self.draw_mosaic(canvas);
            });
        }
        Ok(())
    }
}
