//! tilestitch - Composite images into a single PNG
//!
//! This library lays out source images on a canvas and writes the composite:
//!
//! - horizontal strips of explicitly named images
//! - grids of `x-y.png` tiles read from a folder
//! - grids staged from one zoom level of a zip archive
//!
//! Decoding, blending and encoding are delegated to the `image` crate. The
//! library computes canvas sizes and placements and drives the pipeline; see
//! [`pipeline::run`].

pub mod archive;
pub mod compose;
pub mod config;
pub mod decode;
pub mod error;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod scan;
pub mod tile;

pub use error::{ComposeError, ComposeResult};
pub use pipeline::{run, ComposeConfig, ComposeOutcome, SkipReason, SourceMode};
