//! Model building blocks.
//!
//! Every layer takes its width from the incoming tensor, so one model
//! definition works for any feature count.

use super::scope::ParamScope;
use super::tensor::{Shape, Tensor};
use super::Model;
use crate::error::Result;

const EPSILON: f64 = 1e-5;

pub fn relu(x: &Tensor) -> Tensor {
    x.map(|v| v.max(0.0))
}

/// Shift and scale `x` to zero mean and unit deviation over all elements.
pub fn normalize(x: &Tensor) -> Tensor {
    let mean = x.mean();
    let std = x.std();
    x.map(|v| (v - mean) / (std + EPSILON))
}

/// `gain * normalize(x) + bias` with per-feature gain and bias.
pub fn layer_norm(scope: &mut dyn ParamScope, x: &Tensor) -> Result<Tensor> {
    let dim = x.shape().cols;
    let gain = scope.use_param(Shape::new(1, dim))?;
    let bias = scope.use_param(Shape::new(1, dim))?;
    normalize(x).mul(&gain)?.add(&bias)
}

/// Softmax linear unit: `layer_norm(x * softmax(x))`.
pub fn solu(scope: &mut dyn ParamScope, x: &Tensor) -> Result<Tensor> {
    let gated = x.mul(&x.softmax())?;
    layer_norm(scope, &gated)
}

/// Fully connected map followed by [`solu`].
pub fn full(scope: &mut dyn ParamScope, x: &Tensor) -> Result<Tensor> {
    let dim = x.shape().cols;
    let spin = scope.use_param(Shape::new(dim, dim))?;
    let bias = scope.use_param(Shape::new(1, dim))?;
    solu(scope, &x.matmul(&spin)?.add(&bias)?)
}

/// Single-head scaled dot-product self-attention over the rows of `x`.
pub fn attention(scope: &mut dyn ParamScope, x: &Tensor) -> Result<Tensor> {
    let dim = x.shape().cols;
    let q_map = scope.use_param(Shape::new(dim, dim))?;
    let k_map = scope.use_param(Shape::new(dim, dim))?;
    let v_map = scope.use_param(Shape::new(dim, dim))?;
    let q = x.matmul(&q_map)?;
    let k = x.matmul(&k_map)?;
    let v = x.matmul(&v_map)?;
    let energy = q.matmul(&k.transpose())?.scale(1.0 / (dim as f64).sqrt());
    energy.softmax().matmul(&v)
}

/// Residual blocks `x + relu(x @ spin + shift)`, each followed by a layer norm.
#[derive(Debug, Clone, Copy)]
pub struct Dense {
    pub depth: usize,
}

impl Model for Dense {
    fn name(&self) -> &'static str {
        "dense"
    }

    fn forward(&self, scope: &mut dyn ParamScope, x: Tensor) -> Result<Tensor> {
        let dim = x.shape().cols;
        let mut value = x;
        for _ in 0..self.depth {
            let spin = scope.use_param(Shape::new(dim, dim))?;
            let shift = scope.use_param(Shape::new(1, dim))?;
            let residual = relu(&value.matmul(&spin)?.add(&shift)?);
            value = layer_norm(scope, &value.add(&residual)?)?;
        }
        Ok(value)
    }
}

/// Plain residual blocks `x + relu(x @ map + add)` without normalisation.
#[derive(Debug, Clone, Copy)]
pub struct ResNet {
    pub depth: usize,
}

impl Model for ResNet {
    fn name(&self) -> &'static str {
        "resnet"
    }

    fn forward(&self, scope: &mut dyn ParamScope, x: Tensor) -> Result<Tensor> {
        let dim = x.shape().cols;
        let mut value = x;
        for _ in 0..self.depth {
            let map = scope.use_param(Shape::new(dim, dim))?;
            let add = scope.use_param(Shape::new(1, dim))?;
            let residual = relu(&value.matmul(&map)?.add(&add)?);
            value = value.add(&residual)?;
        }
        Ok(value)
    }
}

/// Post-norm transformer: attention and [`full`] blocks, each residual.
#[derive(Debug, Clone, Copy)]
pub struct Transformer {
    pub depth: usize,
}

impl Model for Transformer {
    fn name(&self) -> &'static str {
        "transformer"
    }

    fn forward(&self, scope: &mut dyn ParamScope, x: Tensor) -> Result<Tensor> {
        let mut value = x;
        for _ in 0..self.depth {
            let attended = attention(scope, &value)?;
            value = layer_norm(scope, &value.add(&attended)?)?;
            let mixed = full(scope, &value)?;
            value = layer_norm(scope, &value.add(&mixed)?)?;
        }
        Ok(value)
    }
}
