//! A small dense row-major matrix of `f64`.
//!
//! Only what the sketch models need: matrix products, broadcasting
//! elementwise ops over rows, and a handful of whole-tensor reductions.

use crate::error::{Result, SketchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Rows and columns of a 2D tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Shape of a parameter of the given grade over `dim` features.
    ///
    /// Grade 0 is a scalar (1x1), grade 1 a row (1 x dim) and grade 2 a
    /// square map (dim x dim). Higher grades are not used by any model.
    pub fn grade(grade: u32, dim: usize) -> Result<Self> {
        match grade {
            0 => Ok(Self::new(1, 1)),
            1 => Ok(Self::new(1, dim)),
            2 => Ok(Self::new(dim, dim)),
            g => Err(SketchError::Shape(format!("unsupported parameter grade {g}"))),
        }
    }

    /// Number of elements.
    pub const fn size(&self) -> usize {
        self.rows * self.cols
    }

    /// Shape produced by broadcasting `self` against `other`, numpy style.
    fn broadcast(&self, other: &Shape) -> Result<Shape> {
        let rows = broadcast_dim(self.rows, other.rows);
        let cols = broadcast_dim(self.cols, other.cols);
        match (rows, cols) {
            (Some(rows), Some(cols)) => Ok(Shape::new(rows, cols)),
            _ => Err(SketchError::Shape(format!(
                "cannot broadcast {self} with {other}"
            ))),
        }
    }
}

fn broadcast_dim(a: usize, b: usize) -> Option<usize> {
    if a == b || b == 1 {
        Some(a)
    } else if a == 1 {
        Some(b)
    } else {
        None
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f64>,
}

impl Tensor {
    pub fn zeros(shape: Shape) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.size()],
        }
    }

    /// Wrap `data` as a tensor of `shape`; the lengths must agree.
    pub fn from_vec(shape: Shape, data: Vec<f64>) -> Result<Self> {
        if data.len() != shape.size() {
            return Err(SketchError::Shape(format!(
                "{} values do not fill {shape}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// A single-row tensor holding `values`.
    pub fn row(values: &[f64]) -> Self {
        Self {
            shape: Shape::new(1, values.len()),
            data: values.to_vec(),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.shape.rows && col < self.shape.cols {
            Some(self.data[row * self.shape.cols + col])
        } else {
            None
        }
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Tensor {
        Tensor {
            shape: self.shape,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Tensor {
        self.map(|x| x * factor)
    }

    pub fn matmul(&self, rhs: &Tensor) -> Result<Tensor> {
        let (n, k) = (self.shape.rows, self.shape.cols);
        let m = rhs.shape.cols;
        if k != rhs.shape.rows {
            return Err(SketchError::Shape(format!(
                "matmul {} @ {}",
                self.shape, rhs.shape
            )));
        }
        let mut out = vec![0.0; n * m];
        for i in 0..n {
            for p in 0..k {
                let a = self.data[i * k + p];
                if a == 0.0 {
                    continue;
                }
                let rhs_row = &rhs.data[p * m..(p + 1) * m];
                for (o, &b) in out[i * m..(i + 1) * m].iter_mut().zip(rhs_row) {
                    *o += a * b;
                }
            }
        }
        Ok(Tensor {
            shape: Shape::new(n, m),
            data: out,
        })
    }

    pub fn transpose(&self) -> Tensor {
        let Shape { rows, cols } = self.shape;
        let mut data = vec![0.0; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                data[c * rows + r] = self.data[r * cols + c];
            }
        }
        Tensor {
            shape: Shape::new(cols, rows),
            data,
        }
    }

    fn zip_with(&self, rhs: &Tensor, f: impl Fn(f64, f64) -> f64) -> Result<Tensor> {
        let shape = self.shape.broadcast(&rhs.shape)?;
        let mut data = Vec::with_capacity(shape.size());
        for r in 0..shape.rows {
            for c in 0..shape.cols {
                data.push(f(self.broadcast_at(r, c), rhs.broadcast_at(r, c)));
            }
        }
        Ok(Tensor { shape, data })
    }

    fn broadcast_at(&self, row: usize, col: usize) -> f64 {
        let r = if self.shape.rows == 1 { 0 } else { row };
        let c = if self.shape.cols == 1 { 0 } else { col };
        self.data[r * self.shape.cols + c]
    }

    /// Elementwise sum with broadcasting of unit dimensions.
    pub fn add(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_with(rhs, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_with(rhs, |a, b| a - b)
    }

    /// Elementwise product with broadcasting of unit dimensions.
    pub fn mul(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_with(rhs, |a, b| a * b)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Mean over every element.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.sum() / self.data.len() as f64
    }

    /// Population standard deviation over every element.
    pub fn std(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let var = self.data.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / self.data.len() as f64;
        var.sqrt()
    }

    /// Softmax over every element of the tensor.
    pub fn softmax(&self) -> Tensor {
        Tensor {
            shape: self.shape,
            data: softmax(&self.data),
        }
    }

    /// Euclidean length of all elements.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

impl Index<(usize, usize)> for Tensor {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.shape.rows && col < self.shape.cols,
            "index ({row}, {col}) out of bounds for {}",
            self.shape
        );
        &self.data[row * self.shape.cols + col]
    }
}

/// Numerically stable softmax of a slice.
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|x| (x - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Index of the largest value; the first one wins ties. Empty slices give 0.
pub fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_val), (i, &v)| {
            if v > best_val {
                (i, v)
            } else {
                (best, best_val)
            }
        })
        .0
}
