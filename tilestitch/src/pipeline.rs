//! Compositing pipeline.
//!
//! One entry point, [`run`], covers every way of producing a composite:
//!
//! ```text
//! Strip      paths ──► decode (parallel) ──► strip layout ──► render ──► PNG
//! Directory  scan ──► parse names ──► decode first tile ──► grid layout ──► render ──► PNG
//! Archive    stage zoom level ──► Directory
//! ```
//!
//! Empty inputs are a successful no-op reported as [`ComposeOutcome::Skipped`];
//! nothing is written in that case.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::archive::stage_zoom_level;
use crate::compose::{Background, Canvas};
use crate::decode::{load_all, load_image};
use crate::error::{ComposeError, ComposeResult};
use crate::layout::{grid_layout, strip_layout, CanvasSize, LayoutPlan, TileSize};
use crate::scan::scan_tiles;
use crate::tile::{LenientTile, ValidationPolicy};

/// Where source images come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    /// Explicit list of images laid out left to right.
    Strip { paths: Vec<PathBuf> },

    /// Folder of `x-y.png` tiles laid out on a grid.
    Directory { dir: PathBuf },

    /// One zoom level of a zip archive, staged to disk and laid out on a grid.
    Archive {
        archive: PathBuf,
        zoom_level: u8,
        staging_dir: PathBuf,
    },
}

impl SourceMode {
    pub fn name(&self) -> &'static str {
        match self {
            SourceMode::Strip { .. } => "strip",
            SourceMode::Directory { .. } => "grid",
            SourceMode::Archive { .. } => "zip",
        }
    }

    /// Background used when none is configured.
    pub fn default_background(&self) -> Background {
        match self {
            SourceMode::Strip { .. } => Background::TransparentWhite,
            SourceMode::Directory { .. } | SourceMode::Archive { .. } => Background::Transparent,
        }
    }
}

/// Configuration for a single compositing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeConfig {
    pub source: SourceMode,

    /// Filename validation for grid sources. Ignored by strips.
    pub policy: ValidationPolicy,

    /// Output PNG path.
    pub output: PathBuf,

    /// Canvas background; `None` uses the source mode's default.
    pub background: Option<Background>,

    /// Compute the layout without writing the output image. Archive sources
    /// are still staged to disk, since the layout is read from staged tiles.
    pub dry_run: bool,
}

impl ComposeConfig {
    fn new(source: SourceMode, output: impl Into<PathBuf>) -> Self {
        Self {
            source,
            policy: ValidationPolicy::default(),
            output: output.into(),
            background: None,
            dry_run: false,
        }
    }

    /// Horizontal strip of explicitly named images.
    pub fn strip(paths: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::new(SourceMode::Strip { paths }, output)
    }

    /// Grid of tiles found in `dir`.
    pub fn grid(dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::new(SourceMode::Directory { dir: dir.into() }, output)
    }

    /// Grid of tiles from one zoom level of a zip archive.
    pub fn archive(
        archive: impl Into<PathBuf>,
        zoom_level: u8,
        staging_dir: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            SourceMode::Archive {
                archive: archive.into(),
                zoom_level,
                staging_dir: staging_dir.into(),
            },
            output,
        )
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Effective canvas background.
    pub fn background(&self) -> Background {
        self.background.unwrap_or_else(|| self.source.default_background())
    }
}

/// Why a run finished without output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No source files at all.
    NoInputs,
    /// Files were found but none is a valid tile.
    NoValidTiles,
    /// The computed canvas has zero width or height.
    EmptyCanvas,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoInputs => write!(f, "no input images"),
            SkipReason::NoValidTiles => write!(f, "no valid tiles"),
            SkipReason::EmptyCanvas => write!(f, "canvas has zero width or height"),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeOutcome {
    /// The composite was written.
    Written {
        path: PathBuf,
        canvas: CanvasSize,
        placed: usize,
        unplaced: Vec<LenientTile>,
    },

    /// Dry run: the layout was computed, nothing was written.
    Planned {
        canvas: CanvasSize,
        placed: usize,
        unplaced: Vec<LenientTile>,
    },

    /// Nothing to do.
    Skipped(SkipReason),
}

/// Run the pipeline described by `config`.
///
/// # Errors
///
/// Any decode, archive or I/O failure aborts the run without writing output.
/// Grid tiles whose size differs from the first tile fail with
/// [`ComposeError::TileSizeMismatch`].
pub fn run(config: &ComposeConfig) -> ComposeResult<ComposeOutcome> {
    info!(
        mode = config.source.name(),
        output = %config.output.display(),
        dry_run = config.dry_run,
        "Starting composite"
    );

    match &config.source {
        SourceMode::Strip { paths } => run_strip(paths, config),
        SourceMode::Directory { dir } => run_grid(dir, config),
        SourceMode::Archive {
            archive,
            zoom_level,
            staging_dir,
        } => {
            let report = stage_zoom_level(archive, *zoom_level, staging_dir)?;
            run_grid(&report.directory, config)
        }
    }
}

fn run_strip(paths: &[PathBuf], config: &ComposeConfig) -> ComposeResult<ComposeOutcome> {
    if paths.is_empty() {
        return Ok(skipped(SkipReason::NoInputs));
    }

    let images = load_all(paths)?;
    let plan = strip_layout(images.iter().map(|a| (a.path.as_path(), a.width, a.height)))?;

    if plan.canvas.is_empty() {
        return Ok(skipped(SkipReason::EmptyCanvas));
    }
    if config.dry_run {
        return Ok(planned(plan));
    }

    let mut canvas = Canvas::new(plan.canvas, config.background());
    for (placement, image) in plan.placements.iter().zip(&images) {
        canvas.draw(placement, &image.pixels);
    }
    canvas.save_png(&config.output)?;

    Ok(written(plan, &config.output))
}

fn run_grid(dir: &Path, config: &ComposeConfig) -> ComposeResult<ComposeOutcome> {
    let scan = scan_tiles(dir, config.policy)?;

    for tile in &scan.unresolved {
        warn!(
            path = %tile.source.display(),
            "Tile name has unparseable coordinates, placement undefined"
        );
    }

    let Some(first) = scan.tiles.first() else {
        let reason = if scan.rejected == 0 && scan.unresolved.is_empty() {
            SkipReason::NoInputs
        } else {
            SkipReason::NoValidTiles
        };
        return Ok(skipped(reason));
    };

    let representative = load_image(&first.source)?;
    let tile_size = TileSize::new(representative.width, representative.height);
    debug!(
        path = %first.source.display(),
        width = tile_size.width,
        height = tile_size.height,
        "Tile size taken from first tile"
    );

    let mut plan = grid_layout(&scan.tiles, tile_size)?;
    plan.unplaced = scan.unresolved;

    if plan.canvas.is_empty() {
        return Ok(skipped(SkipReason::EmptyCanvas));
    }

    if config.dry_run {
        for placement in plan.placements.iter().skip(1) {
            let (width, height) = image::image_dimensions(&placement.source).map_err(|e| {
                ComposeError::Decode {
                    path: placement.source.clone(),
                    source: e,
                }
            })?;
            check_tile_size(&placement.source, (width, height), tile_size)?;
        }
        return Ok(planned(plan));
    }

    let mut canvas = Canvas::new(plan.canvas, config.background());
    let mut representative = Some(representative);
    for placement in &plan.placements {
        let image = match representative.take() {
            Some(image) => image,
            None => load_image(&placement.source)?,
        };
        check_tile_size(&placement.source, image.size(), tile_size)?;
        canvas.draw(placement, &image.pixels);
    }
    canvas.save_png(&config.output)?;

    Ok(written(plan, &config.output))
}

/// Fail fast if a tile does not share the representative tile's size.
fn check_tile_size(path: &Path, actual: (u32, u32), expected: TileSize) -> ComposeResult<()> {
    if actual != (expected.width, expected.height) {
        return Err(ComposeError::TileSizeMismatch {
            path: path.to_path_buf(),
            expected: (expected.width, expected.height),
            actual,
        });
    }
    Ok(())
}

fn skipped(reason: SkipReason) -> ComposeOutcome {
    info!(reason = %reason, "Nothing to composite");
    ComposeOutcome::Skipped(reason)
}

fn planned(plan: LayoutPlan) -> ComposeOutcome {
    ComposeOutcome::Planned {
        canvas: plan.canvas,
        placed: plan.placements.len(),
        unplaced: plan.unplaced,
    }
}

fn written(plan: LayoutPlan, path: &Path) -> ComposeOutcome {
    ComposeOutcome::Written {
        path: path.to_path_buf(),
        canvas: plan.canvas,
        placed: plan.placements.len(),
        unplaced: plan.unplaced,
    }
}
