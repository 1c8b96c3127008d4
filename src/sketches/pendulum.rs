//! Harmonograph pendulums.
//!
//! A pendulum is a sum of harmonics. Each row contributes
//! `(cos(t * xfreq * tau + xphase), sin(t * yfreq * tau + yphase)) / rows`,
//! so each coordinate stays in `[-1, 1]` and the traced point never leaves
//! the NDC square. The two angles are independent, so corners are reachable.

use super::Sketch;
use crate::draw::{palette, Canvas, Point};
use crate::error::{Result, SketchError};
use crate::seed;
use crate::stream::FrameClock;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f64::consts::TAU;

/// Frequencies the pendulum rows are drawn from.
pub const FREQUENCIES: [f64; 4] = [1.0, 1.0 / 2.0, 1.0 / 3.0, 1.0 / 6.0];

/// One row of a pendulum table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    pub xfreq: f64,
    pub xphase: f64,
    pub yfreq: f64,
    pub yphase: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pendulum {
    harmonics: Vec<Harmonic>,
}

impl Pendulum {
    pub fn new(harmonics: Vec<Harmonic>) -> Result<Self> {
        if harmonics.is_empty() {
            return Err(SketchError::Shape("pendulum needs at least one row".into()));
        }
        Ok(Self { harmonics })
    }

    /// `rows` harmonics with frequencies and phases picked from the given tables.
    pub fn random(rng: &mut impl Rng, rows: usize, freqs: &[f64], phases: &[f64]) -> Self {
        let mut pick = |table: &[f64]| table.choose(rng).copied().unwrap_or(0.0);
        let harmonics = (0..rows.max(1))
            .map(|_| Harmonic {
                xfreq: pick(freqs),
                xphase: pick(phases),
                yfreq: pick(freqs),
                yphase: pick(phases),
            })
            .collect();
        Self { harmonics }
    }

    pub fn harmonics(&self) -> &[Harmonic] {
        &self.harmonics
    }

    /// Position at time `t` seconds.
    pub fn point(&self, t: f64) -> Point {
        let factor = 1.0 / self.harmonics.len() as f64;
        self.harmonics.iter().fold(Point::ORIGIN, |acc, h| {
            acc + Point::new(
                (t * h.xfreq * TAU + h.xphase).cos(),
                (t * h.yfreq * TAU + h.yphase).sin(),
            ) * factor
        })
    }

    /// `samples` positions spread over a `window` of seconds starting half a
    /// window before `t`.
    pub fn trail(&self, t: f64, samples: usize, window: f64) -> Vec<Point> {
        let step = window / samples.max(1) as f64;
        (0..samples)
            .map(|i| self.point(t - window / 2.0 + i as f64 * step))
            .collect()
    }
}

/// Run `f` four times, flipping x after even passes and y after odd ones,
/// so one trail is drawn into every quadrant.
pub fn mirror_passes(canvas: &mut Canvas, mut f: impl FnMut(&mut Canvas)) {
    canvas.scoped(|canvas| {
        for pass in 0..4 {
            f(canvas);
            if pass % 2 == 0 {
                canvas.scale(-1.0, 1.0);
            } else {
                canvas.scale(1.0, -1.0);
            }
        }
    });
}

/// Pink harmonograph trails, mirrored four ways, on space cadet.
pub struct PendulumSketch {
    pendulum: Pendulum,
    samples: usize,
    window: f64,
    radius: f64,
}

impl PendulumSketch {
    pub fn new(seed: u64) -> Self {
        let mut rng = seed::rng(seed, "pendulum");
        Self::with_pendulum(Pendulum::random(&mut rng, 4, &FREQUENCIES, &FREQUENCIES))
    }

    pub fn with_pendulum(pendulum: Pendulum) -> Self {
        Self {
            pendulum,
            samples: 512,
            window: 0.25,
            radius: 2.0 / 128.0,
        }
    }

    pub fn pendulum(&self) -> &Pendulum {
        &self.pendulum
    }
}

impl Sketch for PendulumSketch {
    fn name(&self) -> &'static str {
        "pendulum"
    }

    fn draw(&mut self, canvas: &mut Canvas, clock: &FrameClock) -> Result<()> {
        canvas.paint(palette::SPACE_CADET);
        let trail = self.pendulum.trail(clock.time(), self.samples, self.window);
        mirror_passes(canvas, |canvas| {
            for &p in &trail {
                canvas.fill_circle(p, self.radius, palette::SUPER_PINK);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketches::draw_test_frame;

    fn single(xfreq: f64, yfreq: f64) -> Pendulum {
        Pendulum::new(vec![Harmonic {
            xfreq,
            xphase: 0.0,
            yfreq,
            yphase: 0.0,
        }])
        .unwrap()
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(Pendulum::new(Vec::new()).is_err());
    }

    #[test]
    fn one_row_traces_the_unit_circle() {
        let p = single(1.0, 1.0);
        let start = p.point(0.0);
        assert!((start.x - 1.0).abs() < 1e-12 && start.y.abs() < 1e-12);
        let quarter = p.point(0.25);
        assert!(quarter.x.abs() < 1e-12 && (quarter.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn points_stay_in_the_ndc_square() {
        let mut rng = seed::rng(3, "test");
        let p = Pendulum::random(&mut rng, 6, &FREQUENCIES, &FREQUENCIES);
        for i in 0..500 {
            let q = p.point(i as f64 * 0.037);
            assert!(q.x.abs() <= 1.0 + 1e-12 && q.y.abs() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn quarter_phase_reaches_the_corner() {
        let p = Pendulum::new(vec![Harmonic {
            xfreq: 1.0,
            xphase: 0.0,
            yfreq: 1.0,
            yphase: std::f64::consts::FRAC_PI_2,
        }])
        .unwrap();
        let corner = p.point(0.0);
        assert!((corner.x - 1.0).abs() < 1e-12 && (corner.y - 1.0).abs() < 1e-12);
        assert!(corner.length() > 1.4);
    }

    #[test]
    fn trail_is_centred_on_t() {
        let p = single(1.0, 1.0);
        let trail = p.trail(1.0, 4, 0.5);
        assert_eq!(trail.len(), 4);
        assert_eq!(trail[0], p.point(0.75));
        assert_eq!(trail[2], p.point(1.0));
    }

    #[test]
    fn random_picks_from_tables() {
        let mut rng = seed::rng(1, "test");
        let p = Pendulum::random(&mut rng, 4, &FREQUENCIES, &[0.0, 0.5]);
        assert_eq!(p.harmonics().len(), 4);
        for h in p.harmonics() {
            assert!(FREQUENCIES.contains(&h.xfreq) && FREQUENCIES.contains(&h.yfreq));
            assert!(h.xphase == 0.0 || h.xphase == 0.5);
        }
    }

    #[test]
    fn mirror_passes_visit_every_quadrant() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        let before = canvas.transform();
        let mut seen = Vec::new();
        mirror_passes(&mut canvas, |c| seen.push(c.to_device(Point::new(0.5, 0.5))));
        assert_eq!(canvas.transform(), before);
        let mut quads: Vec<(bool, bool)> = seen.iter().map(|p| (p.x > 8.0, p.y > 8.0)).collect();
        quads.sort();
        quads.dedup();
        assert_eq!(quads.len(), 4);
    }

    #[test]
    fn frame_has_background_and_pink() {
        let mut sketch = PendulumSketch::with_pendulum(single(1.0, 1.0));
        let canvas = draw_test_frame(&mut sketch, 64, 0);
        // the centre of the disc is never visited by a unit circle trail
        assert!(canvas.pixel(32, 32).unwrap().distance(palette::SPACE_CADET) < 0.01);
        // t = 0 sits at (1, 0) in NDC, the right edge
        let edge = canvas.pixel(63, 32).unwrap();
        assert!(edge.r > palette::SPACE_CADET.r);
    }

    #[test]
    fn same_seed_same_table() {
        assert_eq!(
            PendulumSketch::new(9).pendulum(),
            PendulumSketch::new(9).pendulum()
        );
    }
}
