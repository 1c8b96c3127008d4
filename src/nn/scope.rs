//! Parameter scopes.
//!
//! Model code never owns its weights. It asks the active scope for the
//! next parameter of a given shape, and the scope decides what that means:
//! [`Init`] only counts the request, [`Eval`] hands out the next slice of a
//! flat parameter vector.

use super::tensor::{Shape, Tensor};
use crate::error::{Result, SketchError};

/// Source of parameters for one pass over a model.
pub trait ParamScope {
    /// Return the next parameter tensor of `shape`.
    fn use_param(&mut self, shape: Shape) -> Result<Tensor>;
}

/// Tracing scope: counts requested parameters and answers with zeros.
#[derive(Debug, Default)]
pub struct Init {
    count: usize,
}

impl Init {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of scalars requested so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl ParamScope for Init {
    fn use_param(&mut self, shape: Shape) -> Result<Tensor> {
        self.count += shape.size();
        Ok(Tensor::zeros(shape))
    }
}

/// Evaluation scope: consumes a flat parameter vector front to back.
#[derive(Debug)]
pub struct Eval<'a> {
    params: &'a [f64],
    index: usize,
}

impl<'a> Eval<'a> {
    pub fn new(params: &'a [f64]) -> Self {
        Self { params, index: 0 }
    }

    /// Number of scalars handed out so far.
    pub fn consumed(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.params.len() - self.index
    }
}

impl ParamScope for Eval<'_> {
    fn use_param(&mut self, shape: Shape) -> Result<Tensor> {
        let size = shape.size();
        if size > self.remaining() {
            return Err(SketchError::ParamsExhausted {
                requested: size,
                remaining: self.remaining(),
            });
        }
        let lhs = self.index;
        let rhs = lhs + size;
        self.index = rhs;
        Tensor::from_vec(shape, self.params[lhs..rhs].to_vec())
    }
}
