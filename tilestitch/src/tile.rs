//! Tile filename parsing.
//!
//! Tiles are named by their grid coordinate: `{x}-{y}.png`
//!
//! Examples:
//! - `0-0.png` (top-left tile)
//! - `3-1.png` (fourth column, second row)
//!
//! Coordinates are grid indices, not pixel offsets. The pixel offset of a tile
//! is its coordinate multiplied by the tile size (see [`crate::layout`]).

use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File extension every tile must carry.
pub const TILE_EXTENSION: &str = ".png";

/// Separator between the x and y coordinate in a tile stem.
pub const COORD_SEPARATOR: char = '-';

/// A tile with a validated grid coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TilePosition {
    /// Column index (increases rightward).
    pub x: u32,
    /// Row index (increases downward).
    pub y: u32,
    /// Path of the tile image on disk.
    pub source: PathBuf,
}

impl TilePosition {
    pub fn new(x: u32, y: u32, source: impl Into<PathBuf>) -> Self {
        Self {
            x,
            y,
            source: source.into(),
        }
    }
}

/// A tile parsed without validation.
///
/// A `None` coordinate is a part of the filename that did not parse as an
/// integer. Such a tile has no defined position on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenientTile {
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub source: PathBuf,
}

impl LenientTile {
    /// Resolve into a [`TilePosition`] when both coordinates parsed.
    pub fn resolve(&self) -> Option<TilePosition> {
        Some(TilePosition::new(self.x?, self.y?, self.source.clone()))
    }
}

/// How strictly tile filenames are validated during a directory scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Reject names that are not exactly `<u32>-<u32>.png`.
    #[default]
    Strict,
    /// Accept every name; unparseable coordinates are kept as unresolved.
    Lenient,
}

impl ValidationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationPolicy::Strict => "strict",
            ValidationPolicy::Lenient => "lenient",
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ValidationPolicy::Strict),
            "lenient" => Ok(ValidationPolicy::Lenient),
            other => Err(format!(
                "unknown validation policy '{}' (expected strict or lenient)",
                other
            )),
        }
    }
}

/// Error parsing a tile filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Filename does not end in `.png`
    MissingExtension,
    /// Stem does not split into exactly two parts
    InvalidPattern,
    /// X coordinate is not an unsigned integer
    InvalidX(String),
    /// Y coordinate is not an unsigned integer
    InvalidY(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingExtension => write!(f, "Filename doesn't end in .png"),
            ParseError::InvalidPattern => write!(f, "Filename doesn't match x-y pattern"),
            ParseError::InvalidX(s) => write!(f, "Invalid x coordinate: {}", s),
            ParseError::InvalidY(s) => write!(f, "Invalid y coordinate: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a tile filename into its grid coordinate.
///
/// # Examples
///
/// ```
/// use tilestitch::tile::parse_tile_filename;
///
/// assert_eq!(parse_tile_filename("1-2.png").unwrap(), (1, 2));
/// assert!(parse_tile_filename("1-2-3.png").is_err());
/// assert!(parse_tile_filename("abc.png").is_err());
/// ```
pub fn parse_tile_filename(filename: &str) -> Result<(u32, u32), ParseError> {
    let stem = filename
        .strip_suffix(TILE_EXTENSION)
        .ok_or(ParseError::MissingExtension)?;

    let mut parts = stem.split(COORD_SEPARATOR);
    let (x_str, y_str) = match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => (x, y),
        _ => return Err(ParseError::InvalidPattern),
    };

    let x = x_str
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidX(x_str.to_string()))?;
    let y = y_str
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidY(y_str.to_string()))?;

    Ok((x, y))
}

/// Parse a tile filename without rejecting anything.
///
/// The `.png` suffix is stripped when present, the stem is split on `-` and
/// the first two parts are parsed independently. Extra parts are ignored.
///
/// ```
/// use tilestitch::tile::parse_tile_filename_lenient;
///
/// assert_eq!(parse_tile_filename_lenient("1-2-3.png"), (Some(1), Some(2)));
/// assert_eq!(parse_tile_filename_lenient("x-2.png"), (None, Some(2)));
/// assert_eq!(parse_tile_filename_lenient("abc.png"), (None, None));
/// ```
pub fn parse_tile_filename_lenient(filename: &str) -> (Option<u32>, Option<u32>) {
    let stem = filename.strip_suffix(TILE_EXTENSION).unwrap_or(filename);
    let mut parts = stem.split(COORD_SEPARATOR);
    let x = parts.next().and_then(|s| s.parse::<u32>().ok());
    let y = parts.next().and_then(|s| s.parse::<u32>().ok());
    (x, y)
}

/// Build a [`TilePosition`] from a path, validating its filename.
pub fn tile_from_path(path: &Path) -> Result<TilePosition, ParseError> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(ParseError::InvalidPattern)?;
    let (x, y) = parse_tile_filename(filename)?;
    Ok(TilePosition::new(x, y, path))
}

/// Build a [`LenientTile`] from a path.
pub fn lenient_tile_from_path(path: &Path) -> LenientTile {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (x, y) = parse_tile_filename_lenient(&filename);
    LenientTile {
        x,
        y,
        source: path.to_path_buf(),
    }
}
