//! Error types for compositing runs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for compositing operations.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Errors that abort a compositing run.
///
/// Filename parse failures are not represented here: they never abort a run
/// and are reported through [`crate::tile::ParseError`] instead.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A source image could not be opened or decoded.
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The output image could not be encoded or written.
    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The zip archive could not be opened or read.
    #[error("failed to read archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A tile does not share the dimensions of the representative tile.
    #[error(
        "tile {} is {}×{}, expected {}×{}",
        .path.display(),
        .actual.0,
        .actual.1,
        .expected.0,
        .expected.1
    )]
    TileSizeMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The computed canvas does not fit in 32-bit pixel dimensions or exceeds
    /// the pixel limit.
    #[error("canvas too large: {0}")]
    CanvasTooLarge(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ComposeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
