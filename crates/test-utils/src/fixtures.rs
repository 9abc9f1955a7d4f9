//! Common test fixtures for canvas tests.
//!
//! This module provides pre-defined palettes and ready-made history
//! directories that represent common startup scenarios.

use std::path::{Path, PathBuf};

use canvas_common::{Palette, Rgb};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tempfile::TempDir;

use crate::generators::blank_canvas_png;

/// Common palette definitions for testing, as JSON documents.
pub mod palettes {
    /// A single red entry.
    pub const RED_ONLY: &str = r##"["#ff0000"]"##;

    /// Two entries: red and blue.
    pub const RED_BLUE: &str = r##"["#ff0000", "#0000ff"]"##;

    /// A small but realistic board palette.
    pub const BOARD: &str = r##"[
        "#ffffff", "#e4e4e4", "#888888", "#222222",
        "#ffa7d1", "#e50000", "#e59500", "#a06a42",
        "#e5d900", "#94e044", "#02be01", "#00d3dd",
        "#0083c7", "#0000ea", "#cf6ee4", "#820080"
    ]"##;
}

/// Parse one of the [`palettes`] documents.
pub fn palette(json: &str) -> Palette {
    Palette::from_json(json).expect("fixture palette must parse")
}

/// Shorthand for a palette built from hex strings.
pub fn palette_of(hex: &[&str]) -> Palette {
    Palette::new(
        hex.iter()
            .map(|h| Rgb::from_hex(h).expect("fixture color must parse"))
            .collect(),
    )
}

/// Parse a snapshot-style timestamp (`%Y%m%d-%H_%M_%S`) into UTC.
pub fn snapshot_time(stamp: &str) -> DateTime<Utc> {
    let naive = NaiveDateTime::parse_from_str(stamp, "%Y%m%d-%H_%M_%S")
        .expect("fixture timestamp must parse");
    Utc.from_utc_datetime(&naive)
}

/// A temporary history directory.
///
/// The directory is removed when the fixture is dropped.
pub struct HistoryFixture {
    dir: TempDir,
}

impl HistoryFixture {
    /// An empty history directory.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp history dir"),
        }
    }

    /// A history directory holding one blank canvas of the given size.
    pub fn with_blank_canvas(width: u32, height: u32) -> Self {
        let fixture = Self::empty();
        fixture.add("20230101-00_00_00.png", &blank_canvas_png(width, height));
        fixture
    }

    /// Write a file (relative to the history root) and return its path.
    pub fn add(&self, name: impl AsRef<Path>, data: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture subdir");
        }
        std::fs::write(&path, data).expect("failed to write fixture file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Write a palette document into a temporary directory.
///
/// Returns the directory guard and the path of `color_list.json`.
pub fn palette_file(json: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp palette dir");
    let path = dir.path().join("color_list.json");
    std::fs::write(&path, json).expect("failed to write palette file");
    (dir, path)
}
