//! Integration tests for the compositing pipeline.
//!
//! These tests drive [`tilestitch::run`] end to end on generated PNG tiles:
//! - grid sizing and placement on real pixels
//! - strict vs lenient filename handling
//! - zip archive staging followed by grid assembly
//!
//! Run with: `cargo test --test pipeline_integration`

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use tilestitch::layout::CanvasSize;
use tilestitch::tile::ValidationPolicy;
use tilestitch::{run, ComposeConfig, ComposeOutcome, SkipReason};

// ============================================================================
// Helper Functions
// ============================================================================

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Write a solid-colour tile and return its path.
fn write_tile(dir: &Path, name: &str, size: u32, color: Rgba<u8>) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(size, size, color).save(&path).unwrap();
    path
}

/// Encode a solid-colour tile as PNG bytes.
fn tile_bytes(size: u32, color: Rgba<u8>) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(size, size, color)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn build_archive(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

fn written_canvas(outcome: &ComposeOutcome) -> CanvasSize {
    match outcome {
        ComposeOutcome::Written { canvas, .. } => *canvas,
        other => panic!("expected Written, got {:?}", other),
    }
}

// ============================================================================
// Grid Tests
// ============================================================================

/// Three 256px tiles in an L shape produce a 512×512 canvas with a gap.
#[test]
fn test_grid_composite_sizes_and_places_tiles() {
    let temp = TempDir::new().unwrap();
    let tiles = temp.path().join("tiles");
    fs::create_dir(&tiles).unwrap();
    write_tile(&tiles, "0-0.png", 256, RED);
    write_tile(&tiles, "1-0.png", 256, GREEN);
    write_tile(&tiles, "0-1.png", 256, BLUE);
    let out = temp.path().join("results").join("out.png");

    let outcome = run(&ComposeConfig::grid(&tiles, &out)).unwrap();
    assert_eq!(written_canvas(&outcome), CanvasSize::new(512, 512));

    let image = image::open(&out).unwrap().into_rgba8();
    assert_eq!(image.dimensions(), (512, 512));
    assert_eq!(image.get_pixel(0, 0), &RED);
    assert_eq!(image.get_pixel(256, 0), &GREEN);
    assert_eq!(image.get_pixel(0, 256), &BLUE);
    // Missing (1, 1) stays transparent
    assert_eq!(image.get_pixel(400, 400), &CLEAR);
}

/// Tile (1, 2) lands at pixel offset (256, 512).
#[test]
fn test_grid_tile_offset() {
    let temp = TempDir::new().unwrap();
    write_tile(temp.path(), "1-2.png", 256, GREEN);
    let out = temp.path().join("out.png");

    let outcome = run(&ComposeConfig::grid(temp.path(), &out)).unwrap();
    assert_eq!(written_canvas(&outcome), CanvasSize::new(512, 768));

    let image = image::open(&out).unwrap().into_rgba8();
    assert_eq!(image.get_pixel(255, 511), &CLEAR);
    assert_eq!(image.get_pixel(256, 512), &GREEN);
    assert_eq!(image.get_pixel(511, 767), &GREEN);
}

#[test]
fn test_grid_empty_directory_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let tiles = temp.path().join("tiles");
    fs::create_dir(&tiles).unwrap();
    let out = temp.path().join("results").join("out.png");

    let outcome = run(&ComposeConfig::grid(&tiles, &out)).unwrap();
    assert_eq!(outcome, ComposeOutcome::Skipped(SkipReason::NoInputs));
    assert!(!out.exists());
    assert!(!temp.path().join("results").exists());
}

// ============================================================================
// Strict vs Lenient
// ============================================================================

/// Strict excludes malformed names; lenient keeps them but cannot place them.
#[test]
fn test_strict_and_lenient_diverge_on_malformed_names() {
    let temp = TempDir::new().unwrap();
    write_tile(temp.path(), "0-0.png", 16, RED);
    write_tile(temp.path(), "x-1.png", 16, BLUE);
    let out = temp.path().join("out.png");

    let strict = run(&ComposeConfig::grid(temp.path(), &out)).unwrap();
    match &strict {
        ComposeOutcome::Written {
            canvas,
            placed,
            unplaced,
            ..
        } => {
            assert_eq!(*canvas, CanvasSize::new(16, 16));
            assert_eq!(*placed, 1);
            assert!(unplaced.is_empty());
        }
        other => panic!("expected Written, got {:?}", other),
    }

    let lenient = run(&ComposeConfig::grid(temp.path(), &out)
        .with_policy(ValidationPolicy::Lenient))
    .unwrap();
    match &lenient {
        ComposeOutcome::Written {
            placed, unplaced, ..
        } => {
            // Known gap: the malformed tile has no defined position
            assert_eq!(*placed, 1);
            assert_eq!(unplaced.len(), 1);
            assert_eq!(unplaced[0].x, None);
            assert_eq!(unplaced[0].y, Some(1));
            assert!(unplaced[0].source.ends_with("x-1.png"));
        }
        other => panic!("expected Written, got {:?}", other),
    }
}

/// Lenient parsing reads `1-0-9.png` as tile (1, 0), which strict rejects.
#[test]
fn test_lenient_places_extra_part_names() {
    let temp = TempDir::new().unwrap();
    write_tile(temp.path(), "0-0.png", 8, RED);
    write_tile(temp.path(), "1-0-9.png", 8, GREEN);
    let out = temp.path().join("out.png");

    let strict = run(&ComposeConfig::grid(temp.path(), &out).with_dry_run(true)).unwrap();
    assert!(matches!(
        strict,
        ComposeOutcome::Planned { placed: 1, .. }
    ));

    let lenient = run(&ComposeConfig::grid(temp.path(), &out)
        .with_policy(ValidationPolicy::Lenient)
        .with_dry_run(true))
    .unwrap();
    match lenient {
        ComposeOutcome::Planned { canvas, placed, .. } => {
            assert_eq!(canvas, CanvasSize::new(16, 8));
            assert_eq!(placed, 2);
        }
        other => panic!("expected Planned, got {:?}", other),
    }
}

// ============================================================================
// Archive Tests
// ============================================================================

/// Only entries under the requested zoom level are staged.
#[test]
fn test_archive_stages_single_zoom_level() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("tiles.zip");
    build_archive(
        &archive,
        &[
            ("4/0-0.png", tile_bytes(32, RED)),
            ("5/0-0.png", tile_bytes(32, BLUE)),
        ],
    );
    let staging = temp.path().join("images");
    let out = temp.path().join("results").join("out.png");

    let outcome = run(&ComposeConfig::archive(&archive, 4, &staging, &out)).unwrap();
    assert_eq!(written_canvas(&outcome), CanvasSize::new(32, 32));

    let staged: Vec<_> = fs::read_dir(staging.join("4"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(staged, vec![std::ffi::OsString::from("0-0.png")]);
    assert!(staging.join("4").join("0-0.png").is_file());
    assert!(!staging.join("5").exists());

    let image = image::open(&out).unwrap().into_rgba8();
    assert_eq!(image.get_pixel(0, 0), &RED);
}

#[test]
fn test_archive_grid_composite() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("tiles.zip");
    build_archive(
        &archive,
        &[
            ("3/0-0.png", tile_bytes(16, RED)),
            ("3/1-1.png", tile_bytes(16, GREEN)),
            ("3/notes.txt", b"not a tile".to_vec()),
        ],
    );
    let out = temp.path().join("out.png");

    let outcome = run(&ComposeConfig::archive(
        &archive,
        3,
        temp.path().join("stage"),
        &out,
    ))
    .unwrap();
    assert_eq!(written_canvas(&outcome), CanvasSize::new(32, 32));

    let image = image::open(&out).unwrap().into_rgba8();
    assert_eq!(image.get_pixel(0, 0), &RED);
    assert_eq!(image.get_pixel(16, 16), &GREEN);
    assert_eq!(image.get_pixel(16, 0), &CLEAR);
}

#[test]
fn test_archive_dry_run_stages_tiles_but_writes_no_output() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("tiles.zip");
    build_archive(&archive, &[("2/1-0.png", tile_bytes(8, RED))]);
    let staging = temp.path().join("stage");
    let out = temp.path().join("out.png");

    let outcome = run(&ComposeConfig::archive(&archive, 2, &staging, &out).with_dry_run(true))
        .unwrap();

    assert_eq!(
        outcome,
        ComposeOutcome::Planned {
            canvas: CanvasSize::new(16, 8),
            placed: 1,
            unplaced: vec![],
        }
    );
    assert!(staging.join("2").join("1-0.png").exists());
    assert!(!out.exists());
}

#[test]
fn test_archive_without_zoom_level_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("tiles.zip");
    build_archive(&archive, &[("5/0-0.png", tile_bytes(8, BLUE))]);
    let out = temp.path().join("out.png");

    let outcome = run(&ComposeConfig::archive(
        &archive,
        4,
        temp.path().join("images"),
        &out,
    ))
    .unwrap();
    assert_eq!(outcome, ComposeOutcome::Skipped(SkipReason::NoInputs));
    assert!(!out.exists());
}

// ============================================================================
// Strip Tests
// ============================================================================

/// Strip placement follows input order even though decoding is parallel.
#[test]
fn test_strip_order_matches_input() {
    let temp = TempDir::new().unwrap();
    let colors = [RED, GREEN, BLUE, RED, GREEN, BLUE];
    let paths: Vec<_> = colors
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let path = temp.path().join(format!("{}.png", i));
            RgbaImage::from_pixel(i as u32 + 1, 4, c).save(&path).unwrap();
            path
        })
        .collect();
    let out = temp.path().join("output.png");

    let outcome = run(&ComposeConfig::strip(paths, &out)).unwrap();
    assert_eq!(written_canvas(&outcome), CanvasSize::new(21, 4));

    let image = image::open(&out).unwrap().into_rgba8();
    // Offsets 0, 1, 3, 6, 10, 15
    for (i, offset) in [0u32, 1, 3, 6, 10, 15].iter().enumerate() {
        assert_eq!(image.get_pixel(*offset, 0), &colors[i]);
    }
}
