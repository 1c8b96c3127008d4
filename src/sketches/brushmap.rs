//! A grid of brush logits. Every frame each cell draws one brush from its
//! softmax distribution and paints it in cell-local coordinates, where the
//! cell spans `[-1, 1]` on both axes.

use super::Sketch;
use crate::draw::{palette, Canvas, Point, Rgba};
use crate::error::{Result, SketchError};
use crate::nn::tensor::softmax;
use crate::seed;
use crate::stream::FrameClock;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;

/// A brush attribute: fixed, or picked at random on every use.
#[derive(Debug, Clone)]
pub enum Signal<T> {
    Constant(T),
    Choice {
        values: Vec<T>,
        weights: WeightedIndex<f64>,
    },
}

impl<T: Copy> Signal<T> {
    pub fn choice(values: Vec<T>, weights: &[f64]) -> Result<Self> {
        if values.len() != weights.len() {
            return Err(SketchError::Shape(format!(
                "{} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        let weights = WeightedIndex::new(weights)
            .map_err(|e| SketchError::Shape(format!("bad weights: {e}")))?;
        Ok(Signal::Choice { values, weights })
    }

    pub fn sample(&self, rng: &mut impl Rng) -> T {
        match self {
            Signal::Constant(v) => *v,
            Signal::Choice { values, weights } => values[weights.sample(rng)],
        }
    }
}

#[derive(Debug, Clone)]
pub enum CellBrush {
    /// Leaves the cell empty.
    Nil,
    /// A filled circle at the cell centre.
    Dot { color: Signal<Rgba>, size: Signal<f64> },
}

impl CellBrush {
    fn draw(&self, canvas: &mut Canvas, rng: &mut impl Rng) {
        match self {
            CellBrush::Nil => {}
            CellBrush::Dot { color, size } => {
                let color = color.sample(rng);
                let size = size.sample(rng);
                canvas.fill_circle(Point::ORIGIN, size, color);
            }
        }
    }
}

/// The library every map starts with: nothing, or a pastel pink dot.
pub fn default_library() -> Result<Vec<CellBrush>> {
    Ok(vec![
        CellBrush::Nil,
        CellBrush::Dot {
            color: Signal::Constant(palette::PASTEL_PINK),
            size: Signal::choice(vec![1.0, 1.0, 1.0], &[0.5, 0.3, 0.2])?,
        },
    ])
}

pub struct BrushMap {
    library: Vec<CellBrush>,
    /// `rows * cols * library.len()` logits, row major.
    logits: Vec<f64>,
    rows: usize,
    cols: usize,
    rng: StdRng,
}

impl BrushMap {
    pub fn new(seed: u64) -> Result<Self> {
        let library = default_library()?;
        let (rows, cols) = (16, 16);
        let mut rng = seed::rng(seed, "brushmap");
        let logits = (0..rows * cols * library.len())
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect();
        Self::from_logits(seed, rows, cols, library, logits)
    }

    pub fn from_logits(
        seed: u64,
        rows: usize,
        cols: usize,
        library: Vec<CellBrush>,
        logits: Vec<f64>,
    ) -> Result<Self> {
        if library.is_empty() {
            return Err(SketchError::Shape("brush library is empty".into()));
        }
        let expected = rows * cols * library.len();
        if logits.len() != expected {
            return Err(SketchError::Shape(format!(
                "brush map needs {expected} logits, got {}",
                logits.len()
            )));
        }
        Ok(Self {
            library,
            logits,
            rows,
            cols,
            rng: seed::rng(seed, "brushmap/pick"),
        })
    }

    fn cell_logits(&self, row: usize, col: usize) -> &[f64] {
        let n = self.library.len();
        let start = (row * self.cols + col) * n;
        &self.logits[start..start + n]
    }

    fn pick(&mut self, row: usize, col: usize) -> Result<usize> {
        let probs = softmax(self.cell_logits(row, col));
        let dist = WeightedIndex::new(&probs)
            .map_err(|e| SketchError::Shape(format!("cell ({row}, {col}): {e}")))?;
        Ok(dist.sample(&mut self.rng))
    }
}

impl Sketch for BrushMap {
    fn name(&self) -> &'static str {
        "brushmap"
    }

    fn draw(&mut self, canvas: &mut Canvas, _clock: &FrameClock) -> Result<()> {
        canvas.paint(palette::SLATE);
        let cell_height = 2.0 / self.rows as f64;
        let cell_width = 2.0 / self.cols as f64;
        let max_radius = cell_height / 2.0;
        for row in 0..self.rows {
            let ndc_y = 2.0 * (row as f64 / self.rows as f64) - 1.0 + max_radius;
            for col in 0..self.cols {
                let ndc_x = 2.0 * (col as f64 / self.cols as f64) - 1.0 + max_radius;
                let index = self.pick(row, col)?;
                let Self { library, rng, .. } = &mut *self;
                let brush = &library[index];
                canvas.scoped(|canvas| {
                    canvas.translate(ndc_x, ndc_y);
                    canvas.scale(cell_width / 2.0, cell_height / 2.0);
                    brush.draw(canvas, rng);
                });
            }
        }
        Ok(())
    }
}
