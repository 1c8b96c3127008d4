//! Error type shared by the library side of the crate.

use thiserror::Error;

/// Root error type for sketch rendering.
#[derive(Error, Debug)]
pub enum SketchError {
    /// A model asked for more parameters than the flat vector holds.
    #[error("parameters exhausted: requested {requested}, {remaining} remaining")]
    ParamsExhausted { requested: usize, remaining: usize },

    /// Tensor or table dimensions do not match what an operation expects.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// The pixel surface could not be allocated.
    #[error("invalid surface size {width}x{height}")]
    Surface { width: u32, height: u32 },

    #[error("unknown sketch: {0}")]
    UnknownSketch(String),

    /// The sketch samples an image but none was configured.
    #[error("sketch `{0}` needs an image; set image.path or pass --image")]
    MissingImage(&'static str),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, SketchError>;
