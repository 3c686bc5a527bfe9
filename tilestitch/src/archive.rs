//! Zip archive staging.
//!
//! Tile archives group tiles by zoom level: `4/0-0.png`, `4/1-0.png`,
//! `5/0-0.png`, ... Staging extracts one zoom level to disk, mirroring the
//! archive's directory structure, so the grid pipeline can treat it as an
//! ordinary tile folder.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::{ComposeError, ComposeResult};

/// Result of staging one zoom level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingReport {
    /// Directory holding the staged tiles (`<staging root>/<zoom>`).
    pub directory: PathBuf,

    /// Number of files written.
    pub staged: usize,

    /// Number of matching entries skipped for an unsafe path or unreadable data.
    pub skipped: usize,
}

/// Archive path prefix for a zoom level.
pub fn zoom_prefix(zoom_level: u8) -> String {
    format!("{}/", zoom_level)
}

/// Extract every entry under `<zoom_level>/` into `staging_root`.
///
/// Entry `4/0-0.png` lands at `<staging_root>/4/0-0.png`. Entries outside the
/// zoom level, entries with unsafe paths, and entries whose data cannot be
/// read are skipped; the rest of the archive is still extracted.
///
/// # Errors
///
/// Fails if the archive cannot be opened or parsed, or if a staged file or
/// directory cannot be written.
pub fn stage_zoom_level(
    archive_path: &Path,
    zoom_level: u8,
    staging_root: &Path,
) -> ComposeResult<StagingReport> {
    let file = File::open(archive_path).map_err(|e| ComposeError::io(archive_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| ComposeError::Archive {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let prefix = zoom_prefix(zoom_level);
    let directory = staging_root.join(zoom_level.to_string());
    fs::create_dir_all(&directory).map_err(|e| ComposeError::io(&directory, e))?;

    let mut staged = 0;
    let mut skipped = 0;

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(index, error = %e, "Skipping unreadable archive entry");
                skipped += 1;
                continue;
            }
        };

        if !entry.name().starts_with(&prefix) {
            continue;
        }

        // `enclosed_name` allows `4/../5/x.png`, which would escape the zoom level
        let Some(relative) = entry
            .enclosed_name()
            .filter(|p| !p.components().any(|c| c == Component::ParentDir))
        else {
            warn!(name = entry.name(), "Skipping archive entry with unsafe path");
            skipped += 1;
            continue;
        };
        let target = staging_root.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| ComposeError::io(&target, e))?;
            continue;
        }

        let mut data = Vec::new();
        if let Err(e) = entry.read_to_end(&mut data) {
            warn!(name = entry.name(), error = %e, "Skipping archive entry with no data");
            skipped += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ComposeError::io(parent, e))?;
        }
        fs::write(&target, &data).map_err(|e| ComposeError::io(&target, e))?;
        debug!(path = %target.display(), bytes = data.len(), "Staged tile");
        staged += 1;
    }

    info!(
        archive = %archive_path.display(),
        zoom_level,
        staged,
        skipped,
        "Staged zoom level"
    );

    Ok(StagingReport {
        directory,
        staged,
        skipped,
    })
}
