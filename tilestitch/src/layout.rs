//! Canvas sizing and placement computation.
//!
//! Two layouts are supported:
//!
//! - **Strip**: images are placed left to right, top-aligned. The canvas is
//!   as wide as all images together and as tall as the tallest one.
//! - **Grid**: tiles of uniform size are placed at `(x * width, y * height)`.
//!   The canvas spans `(max x + 1)` columns and `(max y + 1)` rows; missing
//!   coordinates leave empty regions.
//!
//! Layout is pure arithmetic over already-known dimensions. Nothing here
//! touches the filesystem or decodes pixels.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ComposeError, ComposeResult};
use crate::tile::{LenientTile, TilePosition};

/// Largest canvas, in pixels, that will be allocated (4 GiB of RGBA8).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 30;

/// Output canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the canvas has no drawable area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Uniform size of every tile in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl TileSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left pixel offset of one source on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub source: PathBuf,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Everything needed to render a composite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Output canvas size.
    pub canvas: CanvasSize,

    /// Placements in draw order.
    pub placements: Vec<Placement>,

    /// Tiles with no defined position (lenient policy only). Not drawn.
    pub unplaced: Vec<LenientTile>,
}

/// Compute a left-to-right strip layout.
///
/// `sources` yields `(path, width, height)` in input order. The i-th
/// placement's horizontal offset is the sum of the widths before it.
///
/// # Errors
///
/// Returns [`ComposeError::CanvasTooLarge`] if the total width overflows `u32`
/// or the canvas exceeds [`MAX_CANVAS_PIXELS`].
pub fn strip_layout<'a, I>(sources: I) -> ComposeResult<LayoutPlan>
where
    I: IntoIterator<Item = (&'a Path, u32, u32)>,
{
    let mut left: u32 = 0;
    let mut height: u32 = 0;
    let mut placements = Vec::new();

    for (path, w, h) in sources {
        placements.push(Placement {
            source: path.to_path_buf(),
            offset_x: left,
            offset_y: 0,
        });
        left = left.checked_add(w).ok_or_else(|| {
            ComposeError::CanvasTooLarge(format!(
                "strip width exceeds {} pixels at {}",
                u32::MAX,
                path.display()
            ))
        })?;
        height = height.max(h);
    }

    Ok(LayoutPlan {
        canvas: check_area(CanvasSize::new(left, height))?,
        placements,
        unplaced: Vec::new(),
    })
}

/// Compute a grid layout for tiles of uniform size.
///
/// Placements follow the order of `tiles`. An empty tile list yields an empty
/// canvas.
///
/// # Errors
///
/// Returns [`ComposeError::CanvasTooLarge`] if the canvas does not fit in
/// `u32` pixel dimensions or exceeds [`MAX_CANVAS_PIXELS`].
pub fn grid_layout(tiles: &[TilePosition], tile_size: TileSize) -> ComposeResult<LayoutPlan> {
    let Some(max_x) = tiles.iter().map(|t| t.x).max() else {
        return Ok(LayoutPlan::default());
    };
    let max_y = tiles.iter().map(|t| t.y).max().unwrap_or(0);

    let canvas = check_area(CanvasSize::new(
        grid_extent(max_x, tile_size.width, "width")?,
        grid_extent(max_y, tile_size.height, "height")?,
    ))?;

    // Offsets are bounded by the canvas extent checked above
    let placements = tiles
        .iter()
        .map(|tile| Placement {
            source: tile.source.clone(),
            offset_x: tile.x * tile_size.width,
            offset_y: tile.y * tile_size.height,
        })
        .collect();

    Ok(LayoutPlan {
        canvas,
        placements,
        unplaced: Vec::new(),
    })
}

/// `(max_index + 1) * tile_extent`, checked against `u32`.
fn grid_extent(max_index: u32, tile_extent: u32, axis: &str) -> ComposeResult<u32> {
    let extent = (u64::from(max_index) + 1) * u64::from(tile_extent);
    u32::try_from(extent).map_err(|_| {
        ComposeError::CanvasTooLarge(format!(
            "grid {} of {} pixels exceeds {}",
            axis,
            extent,
            u32::MAX
        ))
    })
}

/// Reject canvases whose pixel buffer would exceed [`MAX_CANVAS_PIXELS`].
fn check_area(canvas: CanvasSize) -> ComposeResult<CanvasSize> {
    let pixels = u64::from(canvas.width) * u64::from(canvas.height);
    if pixels > MAX_CANVAS_PIXELS {
        return Err(ComposeError::CanvasTooLarge(format!(
            "{} canvas has {} pixels, limit is {}",
            canvas, pixels, MAX_CANVAS_PIXELS
        )));
    }
    Ok(canvas)
}
