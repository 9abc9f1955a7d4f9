//! Tests for canvas PNG encoding and decoding.
//!
//! Covers:
//! - Pixel-exact restore of encoded canvases
//! - Indexed vs RGBA format selection
//! - Transparency preservation in the color table

use canvas_codec::{decode_png, encode_png, PixelGrid};
use canvas_common::Rgb;

// ============================================================================
// Helper functions
// ============================================================================

/// A canvas painted with a repeating stripe of the given colors.
fn striped_grid(width: u32, height: u32, colors: &[Rgb]) -> PixelGrid {
    let mut grid = PixelGrid::filled(width, height, Rgb::WHITE);
    for y in 0..height {
        for x in 0..width {
            let color = colors[((x + y) as usize) % colors.len()];
            grid.set(x, y, color.to_rgba());
        }
    }
    grid
}

fn color_type(png: &[u8]) -> u8 {
    png[25]
}

// ============================================================================
// Restore tests
// ============================================================================

#[test]
fn test_blank_canvas_restores_exactly() {
    let grid = PixelGrid::filled(16, 9, Rgb::WHITE);
    let png = encode_png(&grid).unwrap();
    let restored = decode_png(&png).unwrap();

    assert_eq!(restored, grid);
}

#[test]
fn test_striped_canvas_restores_exactly() {
    let palette = [
        Rgb::new(255, 0, 0),
        Rgb::new(0, 255, 0),
        Rgb::new(0, 0, 255),
        Rgb::new(34, 34, 34),
    ];
    let grid = striped_grid(33, 17, &palette);
    let restored = decode_png(&encode_png(&grid).unwrap()).unwrap();

    assert_eq!(restored.width(), 33);
    assert_eq!(restored.height(), 17);
    assert_eq!(restored.as_rgba(), grid.as_rgba());
}

#[test]
fn test_single_pixel_change_survives_restore() {
    let mut grid = PixelGrid::filled(3, 3, Rgb::WHITE);
    grid.set(1, 1, [255, 0, 0, 255]);

    let restored = decode_png(&encode_png(&grid).unwrap()).unwrap();
    for y in 0..3 {
        for x in 0..3 {
            let expected = if (x, y) == (1, 1) {
                [255, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            };
            assert_eq!(restored.get(x, y), Some(expected), "pixel ({}, {})", x, y);
        }
    }
}

// ============================================================================
// Format selection tests
// ============================================================================

#[test]
fn test_palette_canvas_uses_indexed_png() {
    let grid = striped_grid(64, 64, &[Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)]);
    let png = encode_png(&grid).unwrap();
    assert_eq!(color_type(&png), 3);
}

#[test]
fn test_many_colors_fall_back_to_rgba() {
    let mut pixels = Vec::with_capacity(20 * 20 * 4);
    for i in 0..400u32 {
        pixels.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 99, 255]);
    }
    let grid = PixelGrid::from_rgba(20, 20, pixels).unwrap();
    let png = encode_png(&grid).unwrap();

    assert_eq!(color_type(&png), 6);
    assert_eq!(decode_png(&png).unwrap(), grid);
}

#[test]
fn test_indexed_is_smaller_than_rgba_for_large_canvas() {
    let palette: Vec<Rgb> = (0..16).map(|i| Rgb::new(i * 16, 255 - i * 16, 128)).collect();
    let grid = striped_grid(256, 256, &palette);
    let indexed = encode_png(&grid).unwrap();

    // Force RGBA by adding enough unique colors in the last row
    let mut noisy = grid.clone();
    for x in 0..256u32 {
        noisy.set(x, 255, [x as u8, 7, 7, 255]);
    }
    let rgba = encode_png(&noisy).unwrap();

    assert_eq!(color_type(&indexed), 3);
    assert_eq!(color_type(&rgba), 6);
    assert!(indexed.len() < rgba.len());
}

#[test]
fn test_transparency_preserved() {
    let mut grid = PixelGrid::filled(2, 1, Rgb::WHITE);
    grid.set(1, 0, [0, 0, 0, 0]);

    let restored = decode_png(&encode_png(&grid).unwrap()).unwrap();
    assert_eq!(restored.get(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(restored.get(1, 0), Some([0, 0, 0, 0]));
}
