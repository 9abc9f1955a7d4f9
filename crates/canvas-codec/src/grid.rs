//! In-memory RGBA pixel grid.

use canvas_common::Rgb;

/// Row-major RGBA pixel buffer (4 bytes per pixel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelGrid {
    /// Create a grid where every pixel has the given opaque color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let rgba = color.to_rgba();
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes in row-major order.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether signed coordinates fall inside the grid.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y)
    }

    /// RGBA value at `(x, y)`, or `None` when out of range.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(rgba)
    }

    /// Overwrite the pixel at `(x, y)` and return its previous value.
    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> Option<[u8; 4]> {
        let previous = self.get(x, y)?;
        let offset = self.offset(x, y)?;
        self.pixels[offset..offset + 4].copy_from_slice(&rgba);
        Some(previous)
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}
