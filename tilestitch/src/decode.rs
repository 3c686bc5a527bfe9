//! Source image decoding.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::{ComposeError, ComposeResult};

/// A decoded source image.
#[derive(Debug, Clone)]
pub struct ImageAttributes {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub pixels: RgbaImage,
}

impl ImageAttributes {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Decode a single image into RGBA8.
pub fn load_image(path: &Path) -> ComposeResult<ImageAttributes> {
    let pixels = image::open(path)
        .map_err(|e| ComposeError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();
    let (width, height) = pixels.dimensions();

    trace!(path = %path.display(), width, height, "Decoded image");

    Ok(ImageAttributes {
        path: path.to_path_buf(),
        width,
        height,
        pixels,
    })
}

/// Decode all images in parallel.
///
/// Results are returned in the order of `paths` regardless of which decode
/// finishes first. The first failure discards every other result.
pub fn load_all(paths: &[PathBuf]) -> ComposeResult<Vec<ImageAttributes>> {
    debug!(count = paths.len(), "Decoding images in parallel");
    paths.par_iter().map(|path| load_image(path)).collect()
}
