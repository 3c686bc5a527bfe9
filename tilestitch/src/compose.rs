//! Canvas rendering and PNG output.
//!
//! Pixel work is delegated to the `image` crate: the canvas is an
//! [`RgbaImage`] filled with the background colour and each source is
//! alpha-blended onto it with [`image::imageops::overlay`].

use std::fs;
use std::path::Path;
use std::str::FromStr;

use image::{ImageFormat, Rgba, RgbaImage};
use tracing::{debug, info};

use crate::error::{ComposeError, ComposeResult};
use crate::layout::{CanvasSize, Placement};

/// Canvas background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Fully transparent black.
    Transparent,
    /// White with zero alpha.
    TransparentWhite,
}

impl Background {
    pub fn rgba(&self) -> Rgba<u8> {
        match self {
            Background::Transparent => Rgba([0, 0, 0, 0]),
            Background::TransparentWhite => Rgba([255, 255, 255, 0]),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Background::Transparent => "transparent",
            Background::TransparentWhite => "white",
        }
    }
}

impl FromStr for Background {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transparent" => Ok(Background::Transparent),
            "white" => Ok(Background::TransparentWhite),
            other => Err(format!(
                "unknown background '{}' (expected transparent or white)",
                other
            )),
        }
    }
}

/// Output canvas being composited.
pub struct Canvas {
    image: RgbaImage,
    drawn: usize,
}

impl Canvas {
    /// Allocate a canvas filled with `background`.
    pub fn new(size: CanvasSize, background: Background) -> Self {
        Self {
            image: RgbaImage::from_pixel(size.width, size.height, background.rgba()),
            drawn: 0,
        }
    }

    /// Alpha-blend `source` at the placement's offset.
    ///
    /// Pixels falling outside the canvas are clipped.
    pub fn draw(&mut self, placement: &Placement, source: &RgbaImage) {
        image::imageops::overlay(
            &mut self.image,
            source,
            i64::from(placement.offset_x),
            i64::from(placement.offset_y),
        );
        self.drawn += 1;
    }

    /// Number of sources drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn size(&self) -> CanvasSize {
        let (width, height) = self.image.dimensions();
        CanvasSize::new(width, height)
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the canvas as PNG, creating parent directories as needed.
    pub fn save_png(&self, path: &Path) -> ComposeResult<()> {
        write_png(&self.image, path)?;
        info!(
            path = %path.display(),
            size = %self.size(),
            sources = self.drawn,
            "Wrote composite"
        );
        Ok(())
    }
}

/// Encode `image` as an RGBA PNG at `path`.
pub fn write_png(image: &RgbaImage, path: &Path) -> ComposeResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ComposeError::io(parent, e))?;
    }

    debug!(path = %path.display(), "Encoding PNG");
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| ComposeError::Encode {
            path: path.to_path_buf(),
            source: e,
        })
}
