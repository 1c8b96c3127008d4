//! Sketchbook - small generative animations driven by untrained networks.
//!
//! Each sketch draws frame after frame into a [`draw::Canvas`] laid out in
//! normalised device coordinates. The frame loop in [`stream`] writes every
//! frame as raw ARGB32 so the output can be piped straight into a video
//! encoder. The [`nn`] module holds the parameter-scoped networks several
//! sketches use as their source of shapes and colors.

pub mod config;
pub mod draw;
pub mod error;
pub mod nn;
pub mod seed;
pub mod sketches;
pub mod stream;
pub mod svg;

pub use config::SketchbookConfig;
pub use error::{Result, SketchError};
pub use sketches::{Sketch, SketchContext, SketchKind};
pub use stream::{FrameClock, FrameSettings};
