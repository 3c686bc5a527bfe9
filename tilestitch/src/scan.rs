//! Tile directory discovery.
//!
//! Scans a tile folder and classifies each regular file by its name according
//! to the configured [`ValidationPolicy`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ComposeError, ComposeResult};
use crate::tile::{
    lenient_tile_from_path, tile_from_path, LenientTile, TilePosition, ValidationPolicy,
};

/// Result of scanning a tile directory.
#[derive(Debug, Clone, Default)]
pub struct TileScan {
    /// Tiles with a resolved grid coordinate, in file name order.
    pub tiles: Vec<TilePosition>,

    /// Tiles kept by the lenient policy whose coordinates did not parse.
    ///
    /// Always empty under [`ValidationPolicy::Strict`].
    pub unresolved: Vec<LenientTile>,

    /// Number of files excluded by the strict policy.
    pub rejected: usize,
}

impl TileScan {
    /// Whether the scan found nothing that could be placed.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Scan `dir` for tiles.
///
/// Only regular files are considered; subdirectories are ignored. Files are
/// visited in file name order so the first tile is deterministic.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be read.
pub fn scan_tiles(dir: &Path, policy: ValidationPolicy) -> ComposeResult<TileScan> {
    let files = list_files(dir)?;
    let mut scan = TileScan::default();

    for path in files {
        match policy {
            ValidationPolicy::Strict => match tile_from_path(&path) {
                Ok(tile) => scan.tiles.push(tile),
                Err(e) => {
                    debug!(path = %path.display(), reason = %e, "Skipping non-tile file");
                    scan.rejected += 1;
                }
            },
            ValidationPolicy::Lenient => {
                let tile = lenient_tile_from_path(&path);
                match tile.resolve() {
                    Some(resolved) => scan.tiles.push(resolved),
                    None => scan.unresolved.push(tile),
                }
            }
        }
    }

    debug!(
        dir = %dir.display(),
        policy = policy.as_str(),
        tiles = scan.tiles.len(),
        unresolved = scan.unresolved.len(),
        rejected = scan.rejected,
        "Tile scan complete"
    );

    Ok(scan)
}

/// List regular files directly inside `dir`, sorted by file name.
fn list_files(dir: &Path) -> ComposeResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ComposeError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ComposeError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
