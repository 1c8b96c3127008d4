//! A still poster rendered to SVG: a four-way mirrored pendulum trace in
//! fine teal dots, then larger slate discs and rings packed into the gaps.

use super::pendulum::{Harmonic, Pendulum};
use crate::draw::{palette, Circle, Point, SpriteField};
use crate::error::Result;
use crate::seed;
use crate::svg::{Style, SvgBuilder, SvgTransform};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Radii for the trace, weighted by repetition.
const FINE_SIZES: [f64; 18] = [
    2.0 / 256.0, 2.0 / 256.0, 2.0 / 256.0, 2.0 / 256.0, 2.0 / 256.0,
    2.0 / 256.0, 2.0 / 256.0, 2.0 / 256.0, 2.0 / 256.0, 2.0 / 256.0,
    2.0 / 128.0, 2.0 / 128.0, 2.0 / 128.0, 2.0 / 128.0,
    2.0 / 128.0, 2.0 / 128.0, 2.0 / 128.0, 2.0 / 128.0,
];

/// Radii for the packed discs, weighted by repetition.
const COARSE_SIZES: [f64; 14] = [
    2.0 / 64.0, 2.0 / 64.0, 2.0 / 64.0, 2.0 / 64.0, 2.0 / 64.0, 2.0 / 64.0, 2.0 / 64.0,
    2.0 / 32.0, 2.0 / 32.0, 2.0 / 32.0, 2.0 / 32.0,
    2.0 / 16.0, 2.0 / 16.0,
    2.0 / 8.0,
];

/// Drawn trace dots are smaller than the space they reserve.
const FINE_DOT_SCALE: f64 = 0.4;
const RING_CHANCE: f64 = 0.2;
const RING_WIDTH: f64 = 0.01;
/// Packed disc centres stay inside this square.
const PACK_EXTENT: f64 = 0.95;

#[derive(Debug, Clone)]
pub struct Poster {
    pub size: u32,
    pub seed: u64,
    pub samples: usize,
    pub attempts: usize,
}

impl Poster {
    pub fn new(seed: u64) -> Self {
        Self {
            size: 2048,
            seed,
            samples: 50_000,
            attempts: 5_000,
        }
    }

    /// Two rows with frequencies from `5u + 0.5` and no phase.
    fn pendulum(rng: &mut impl Rng) -> Result<Pendulum> {
        let harmonics = (0..2)
            .map(|_| Harmonic {
                xfreq: 5.0 * rng.gen::<f64>() + 0.5,
                xphase: 0.0,
                yfreq: 5.0 * rng.gen::<f64>() + 0.5,
                yphase: 0.0,
            })
            .collect();
        Pendulum::new(harmonics)
    }

    pub fn generate(&self) -> Result<String> {
        let mut rng = seed::rng(self.seed, "poster");
        let size = self.size as f64;
        let mut svg = SvgBuilder::new(self.size, self.size);

        let margin = size / 32.0;
        svg.rect(0.0, 0.0, size, size, &Style::fill(palette::SLATE));
        svg.rect(
            margin,
            margin,
            size - 2.0 * margin,
            size - 2.0 * margin,
            &Style::fill(palette::BLUSH),
        );

        svg.begin_group(&[
            SvgTransform::Translate(size / 2.0, size / 2.0),
            SvgTransform::Scale(size / 2.5, size / 2.5),
        ]);

        let pendulum = Self::pendulum(&mut rng)?;
        let mut field = SpriteField::new(2.0 / 32.0);
        let trace = Style::fill(palette::TEAL);
        for i in 0..self.samples {
            let t = i as f64 / self.samples as f64;
            let radius = *FINE_SIZES.choose(&mut rng).unwrap_or(&FINE_SIZES[0]);
            for p in pendulum.point(t).mirrors() {
                field.insert(Circle::new(p, radius));
                svg.circle(p.x, p.y, radius * FINE_DOT_SCALE, &trace);
            }
        }
        debug!(dots = field.len(), "pendulum traced");

        let disc = Style::fill(palette::SLATE);
        let ring = Style::stroke(palette::SLATE, RING_WIDTH);
        let mut packed = 0usize;
        for _ in 0..self.attempts {
            let center = Point::new(
                rng.gen_range(-PACK_EXTENT..PACK_EXTENT),
                rng.gen_range(-PACK_EXTENT..PACK_EXTENT),
            );
            let radius = *COARSE_SIZES.choose(&mut rng).unwrap_or(&COARSE_SIZES[0]);
            let group = center.mirrors().map(|p| Circle::new(p, radius));
            if !field.try_place_all(&group) {
                continue;
            }
            packed += 1;
            for c in group {
                let style = if rng.gen::<f64>() < RING_CHANCE { &ring } else { &disc };
                svg.circle(c.center.x, c.center.y, c.radius, style);
            }
        }
        debug!(groups = packed, attempts = self.attempts, "discs packed");

        svg.end_group();
        Ok(svg.finish())
    }
}
