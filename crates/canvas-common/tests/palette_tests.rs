//! Tests for palette loading.
//!
//! Covers:
//! - Reading palette documents from disk
//! - Rejection of malformed documents
//! - Index lookup at the palette edges

use std::fs;

use canvas_common::{CanvasError, Palette, Rgb};
use tempfile::TempDir;

// ============================================================================
// Helper functions
// ============================================================================

fn write_palette(json: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("color_list.json");
    fs::write(&path, json).unwrap();
    (dir, path)
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_palette_file() {
    let (_dir, path) = write_palette(r##"["#FFFFFF", "#e50000", "0000ea"]"##);
    let palette = Palette::from_file(&path).unwrap();

    assert_eq!(palette.len(), 3);
    assert_eq!(palette.get(0), Some(Rgb::WHITE));
    assert_eq!(palette.get(1), Some(Rgb::new(0xe5, 0, 0)));
    assert_eq!(palette.get(2), Some(Rgb::new(0, 0, 0xea)));
    assert_eq!(palette.hex_strings(), vec!["#ffffff", "#e50000", "#0000ea"]);
}

#[test]
fn test_empty_palette_loads() {
    let (_dir, path) = write_palette("[]");
    let palette = Palette::from_file(&path).unwrap();
    assert!(palette.is_empty());
    assert_eq!(palette.get(0), None);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = Palette::from_file(dir.path().join("nope.json"));
    assert!(matches!(result, Err(CanvasError::InvalidPalette(_))));
}

#[test]
fn test_malformed_documents() {
    for json in [
        "",
        "{}",
        r##"["#ff00"]"##,
        r##"["#gg0000"]"##,
        r#"[16711680]"#,
        r##"["#ff0000""##,
    ] {
        let (_dir, path) = write_palette(json);
        assert!(
            matches!(Palette::from_file(&path), Err(CanvasError::InvalidPalette(_))),
            "{:?} should be rejected",
            json
        );
    }
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn test_index_edges() {
    let palette = Palette::from_json(r##"["#ff0000", "#0000ff"]"##).unwrap();
    assert!(palette.get(-1).is_none());
    assert!(palette.get(1).is_some());
    assert!(palette.get(2).is_none());
    assert!(palette.get(i64::MAX).is_none());
}

#[test]
fn test_round_trips_through_json() {
    let palette = Palette::new(vec![Rgb::new(1, 2, 3), Rgb::new(250, 251, 252)]);
    let json = serde_json::to_string(&palette).unwrap();
    assert_eq!(json, r##"["#010203","#fafbfc"]"##);
    assert_eq!(Palette::from_json(&json).unwrap(), palette);
}
