//! Parameter-scoped model evaluation.
//!
//! A [`Model`] is written once against a [`ParamScope`] and then run in two
//! ways. Traced with [`Init`], it reports how many parameters it needs.
//! Evaluated with [`Eval`], it consumes a flat parameter vector in the same
//! order. The networks here are never trained: [`init`] fills the vector
//! with standard normal noise and the sketches enjoy whatever comes out.

pub mod layers;
pub mod scope;
pub mod tensor;

pub use layers::{Dense, ResNet, Transformer};
pub use scope::{Eval, Init, ParamScope};
pub use tensor::{Shape, Tensor};

use crate::error::{Result, SketchError};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An expression over a tensor whose weights come from a scope.
pub trait Model {
    fn name(&self) -> &'static str;

    fn forward(&self, scope: &mut dyn ParamScope, x: Tensor) -> Result<Tensor>;
}

/// Which network a sketch drives its field with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Dense,
    ResNet,
    Transformer,
}

impl ModelKind {
    pub fn build(self, depth: usize) -> Box<dyn Model> {
        match self {
            ModelKind::Dense => Box::new(Dense { depth }),
            ModelKind::ResNet => Box::new(ResNet { depth }),
            ModelKind::Transformer => Box::new(Transformer { depth }),
        }
    }
}

/// A flat parameter vector for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Name of the model that traced this vector.
    pub model: String,
    /// Shape of the source the model was traced with.
    pub source: Shape,
    values: Vec<f64>,
}

impl Params {
    pub fn new(model: impl Into<String>, source: Shape, values: Vec<f64>) -> Self {
        Self {
            model: model.into(),
            source,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Trace `model` on a zero source and return the number of scalars it uses.
pub fn param_count(model: &dyn Model, source: Shape) -> Result<usize> {
    let mut scope = Init::new();
    model.forward(&mut scope, Tensor::zeros(source))?;
    Ok(scope.count())
}

/// Trace `model` and draw a standard normal parameter vector for it.
pub fn init(model: &dyn Model, source: Shape, rng: &mut impl Rng) -> Result<Params> {
    let count = param_count(model, source)?;
    let values: Vec<f64> = (0..count).map(|_| rng.sample(StandardNormal)).collect();
    debug!(model = model.name(), %source, count, "initialised parameters");
    Ok(Params::new(model.name(), source, values))
}

/// Run `model` on `source` with weights taken from `params`.
///
/// The source must have the width the parameters were traced with, or the
/// parameter slices no longer line up with the layers.
pub fn eval(model: &dyn Model, params: &Params, source: Tensor) -> Result<Tensor> {
    if source.shape().cols != params.source.cols {
        return Err(SketchError::Shape(format!(
            "source {} does not match traced source {}",
            source.shape(),
            params.source
        )));
    }
    let mut scope = Eval::new(params.as_slice());
    model.forward(&mut scope, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// `x @ w + b`, the smallest model worth tracing.
    struct Affine;

    impl Model for Affine {
        fn name(&self) -> &'static str {
            "affine"
        }

        fn forward(&self, scope: &mut dyn ParamScope, x: Tensor) -> Result<Tensor> {
            let dim = x.shape().cols;
            let w = scope.use_param(Shape::grade(2, dim)?)?;
            let b = scope.use_param(Shape::grade(1, dim)?)?;
            x.matmul(&w)?.add(&b)
        }
    }

    #[test]
    fn init_and_eval_agree_on_size() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let source = Shape::new(1, 3);
        let params = init(&Affine, source, &mut rng).unwrap();
        assert_eq!(params.len(), param_count(&Affine, source).unwrap());
        assert_eq!(params.len(), 12);

        let mut scope = Eval::new(params.as_slice());
        Affine.forward(&mut scope, Tensor::zeros(source)).unwrap();
        assert_eq!(scope.consumed(), params.len());
    }

    #[test]
    fn eval_uses_parameters_in_order() {
        // identity weights, bias [1, 2]
        let params = Params::new("affine", Shape::new(1, 2), vec![1.0, 0.0, 0.0, 1.0, 1.0, 2.0]);
        let out = eval(&Affine, &params, Tensor::row(&[3.0, 4.0])).unwrap();
        assert_eq!(out.as_slice(), &[4.0, 6.0]);
    }

    #[test]
    fn short_vector_is_an_error() {
        let params = Params::new("affine", Shape::new(1, 2), vec![0.0; 5]);
        let err = eval(&Affine, &params, Tensor::row(&[1.0, 1.0])).unwrap_err();
        assert!(matches!(err, SketchError::ParamsExhausted { .. }));
    }

    #[test]
    fn long_vector_leaves_tail_unused() {
        let params = Params::new("affine", Shape::new(1, 2), vec![0.0; 10]);
        assert!(eval(&Affine, &params, Tensor::row(&[1.0, 1.0])).is_ok());
    }

    #[test]
    fn mismatched_source_width_is_rejected() {
        let params = Params::new("affine", Shape::new(1, 2), vec![0.0; 6]);
        let err = eval(&Affine, &params, Tensor::row(&[1.0, 1.0, 1.0])).unwrap_err();
        assert!(matches!(err, SketchError::Shape(_)));
    }

    #[test]
    fn init_is_seeded() {
        let source = Shape::new(1, 4);
        let a = init(&Dense { depth: 1 }, source, &mut rand::rngs::StdRng::seed_from_u64(5)).unwrap();
        let b = init(&Dense { depth: 1 }, source, &mut rand::rngs::StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn params_round_trip_through_json() {
        let params = Params::new("dense", Shape::new(1, 2), vec![0.5, -1.5]);
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"model\":\"dense\""));
        let back: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn model_kind_builds_named_models() {
        assert_eq!(ModelKind::Dense.build(2).name(), "dense");
        assert_eq!(ModelKind::ResNet.build(2).name(), "resnet");
        assert_eq!(ModelKind::Transformer.build(2).name(), "transformer");
    }
}
