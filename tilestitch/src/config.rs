//! INI configuration file.
//!
//! Every setting is optional. Values resolve as: command-line flag, then this
//! file, then the compiled-in default.
//!
//! ```ini
//! [compose]
//! background = transparent
//!
//! [strip]
//! images = images/1.jpg, images/2.jpg, images/3.jpg
//! output = output.png
//!
//! [grid]
//! directory = images/tiles
//! output = results/out.png
//! policy = strict
//!
//! [zip]
//! archive = images/tiles.zip
//! zoom_level = 4
//! staging_dir = images
//! output = results/out.png
//! policy = strict
//! ```

use std::path::{Path, PathBuf};

use ini::{Ini, Properties};

use crate::compose::Background;
use crate::error::{ComposeError, ComposeResult};
use crate::tile::ValidationPolicy;

/// Default strip inputs.
pub const DEFAULT_STRIP_IMAGES: [&str; 3] = ["images/1.jpg", "images/2.jpg", "images/3.jpg"];
/// Default strip output.
pub const DEFAULT_STRIP_OUTPUT: &str = "output.png";
/// Default tile folder for grid runs.
pub const DEFAULT_TILE_DIR: &str = "images/tiles";
/// Default output for grid and archive runs.
pub const DEFAULT_GRID_OUTPUT: &str = "results/out.png";
/// Default tile archive.
pub const DEFAULT_ARCHIVE: &str = "images/tiles.zip";
/// Default zoom level extracted from archives.
pub const DEFAULT_ZOOM_LEVEL: u8 = 4;
/// Default staging root for archive extraction.
pub const DEFAULT_STAGING_DIR: &str = "images";

/// `[compose]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeSettings {
    pub background: Option<Background>,
}

/// `[strip]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripSettings {
    pub images: Option<Vec<PathBuf>>,
    pub output: Option<PathBuf>,
}

/// `[grid]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridSettings {
    pub directory: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub policy: Option<ValidationPolicy>,
}

/// `[zip]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZipSettings {
    pub archive: Option<PathBuf>,
    pub zoom_level: Option<u8>,
    pub staging_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub policy: Option<ValidationPolicy>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub compose: ComposeSettings,
    pub strip: StripSettings,
    pub grid: GridSettings,
    pub zip: ZipSettings,
}

impl ConfigFile {
    /// Load configuration from an INI file.
    pub fn load_from(path: &Path) -> ComposeResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| {
            ComposeError::Config(format!("failed to load {}: {}", path.display(), e))
        })?;
        Self::from_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn parse(text: &str) -> ComposeResult<Self> {
        let ini = Ini::load_from_str(text)
            .map_err(|e| ComposeError::Config(format!("failed to parse config: {}", e)))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> ComposeResult<Self> {
        let mut config = ConfigFile::default();

        if let Some(section) = ini.section(Some("compose")) {
            config.compose.background = parse_value(section, "compose", "background")?;
        }

        if let Some(section) = ini.section(Some("strip")) {
            config.strip.images = section.get("images").map(parse_path_list);
            config.strip.output = path_value(section, "output");
        }

        if let Some(section) = ini.section(Some("grid")) {
            config.grid.directory = path_value(section, "directory");
            config.grid.output = path_value(section, "output");
            config.grid.policy = parse_value(section, "grid", "policy")?;
        }

        if let Some(section) = ini.section(Some("zip")) {
            config.zip.archive = path_value(section, "archive");
            config.zip.zoom_level = parse_value(section, "zip", "zoom_level")?;
            config.zip.staging_dir = path_value(section, "staging_dir");
            config.zip.output = path_value(section, "output");
            config.zip.policy = parse_value(section, "zip", "policy")?;
        }

        Ok(config)
    }
}

fn path_value(section: &Properties, key: &str) -> Option<PathBuf> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_path_list(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn parse_value<T>(section: &Properties, name: &str, key: &str) -> ComposeResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match section.get(key).map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| {
            ComposeError::Config(format!("{}.{} = '{}': {}", name, key, raw, e))
        }),
    }
}
