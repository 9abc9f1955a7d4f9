//! Canvas generators for creating predictable test images.
//!
//! These generators create canvases whose every pixel can be recomputed
//! from its coordinates, so tests can verify exactly what changed.

use canvas_codec::encode_png;
use canvas_common::Rgb;

pub use canvas_codec::PixelGrid;

/// Creates an all-white canvas.
///
/// # Example
///
/// ```
/// use test_utils::blank_grid;
///
/// let grid = blank_grid(3, 3);
/// assert_eq!(grid.get(1, 1), Some([255, 255, 255, 255]));
/// ```
pub fn blank_grid(width: u32, height: u32) -> PixelGrid {
    PixelGrid::filled(width, height, Rgb::WHITE)
}

/// Creates a canvas where pixel `(x, y)` has color `colors[(x + y) % len]`.
pub fn diagonal_grid(width: u32, height: u32, colors: &[Rgb]) -> PixelGrid {
    let mut grid = blank_grid(width, height);
    if colors.is_empty() {
        return grid;
    }
    for y in 0..height {
        for x in 0..width {
            grid.set(x, y, colors[(x + y) as usize % colors.len()].to_rgba());
        }
    }
    grid
}

/// PNG bytes of an all-white canvas.
pub fn blank_canvas_png(width: u32, height: u32) -> Vec<u8> {
    grid_png(&blank_grid(width, height))
}

/// PNG bytes of an arbitrary grid.
pub fn grid_png(grid: &PixelGrid) -> Vec<u8> {
    encode_png(grid).expect("test canvas must encode")
}

/// Coordinates of every pixel that differs between two equally sized grids,
/// in row-major order.
pub fn changed_pixels(before: &PixelGrid, after: &PixelGrid) -> Vec<(u32, u32)> {
    let mut changed = Vec::new();
    for y in 0..before.height().min(after.height()) {
        for x in 0..before.width().min(after.width()) {
            if before.get(x, y) != after.get(x, y) {
                changed.push((x, y));
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_grid_pattern() {
        let colors = [Rgb::new(1, 0, 0), Rgb::new(0, 1, 0)];
        let grid = diagonal_grid(3, 3, &colors);
        assert_eq!(grid.get(0, 0), Some([1, 0, 0, 255]));
        assert_eq!(grid.get(1, 0), Some([0, 1, 0, 255]));
        assert_eq!(grid.get(1, 1), Some([1, 0, 0, 255]));
    }

    #[test]
    fn test_blank_canvas_png_signature() {
        let png = blank_canvas_png(4, 4);
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_changed_pixels() {
        let before = blank_grid(2, 2);
        let mut after = before.clone();
        after.set(1, 0, [0, 0, 0, 255]);
        after.set(0, 1, [0, 0, 0, 255]);
        assert_eq!(changed_pixels(&before, &after), vec![(1, 0), (0, 1)]);
    }
}
