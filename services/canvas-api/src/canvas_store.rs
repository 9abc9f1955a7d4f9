//! The single shared canvas.
//!
//! Design considerations:
//! - The RGBA grid is the source of truth and sits behind a writer mutex that
//!   is held for the whole mutate, encode and publish sequence, so placements
//!   are linearized and never lose an update.
//! - Readers never touch the grid. They clone the last published PNG from a
//!   separate RwLock that is only write-locked for the pointer swap.
//! - A failed encode restores the changed pixel, leaving the previously
//!   published image and the grid in agreement. The encoder is a plain
//!   function so that failure path can be exercised.

use bytes::Bytes;
use canvas_codec::{decode_png, encode_png, PixelGrid};
use canvas_common::{CanvasError, CanvasResult, Palette, Rgb};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};

/// Function that turns the live grid into the published image.
pub type Encoder = fn(&PixelGrid) -> Result<Vec<u8>, String>;

/// Shared canvas with atomic read and atomic single-pixel update.
pub struct CanvasStore {
    palette: Palette,
    encoder: Encoder,
    width: u32,
    height: u32,
    grid: Mutex<PixelGrid>,
    published: RwLock<Bytes>,
}

impl CanvasStore {
    /// Build a store from a decoded grid, publishing its initial encoding.
    pub fn new(grid: PixelGrid, palette: Palette) -> CanvasResult<Self> {
        Self::with_encoder(grid, palette, encode_png)
    }

    /// Like [`CanvasStore::new`] with a custom encoder.
    pub fn with_encoder(grid: PixelGrid, palette: Palette, encoder: Encoder) -> CanvasResult<Self> {
        let encoded = encoder(&grid).map_err(CanvasError::Codec)?;
        Ok(Self {
            palette,
            encoder,
            width: grid.width(),
            height: grid.height(),
            grid: Mutex::new(grid),
            published: RwLock::new(Bytes::from(encoded)),
        })
    }

    /// Build a store from a PNG, e.g. a restored snapshot.
    pub fn from_encoded(png: &[u8], palette: Palette) -> CanvasResult<Self> {
        let grid = decode_png(png).map_err(CanvasError::Codec)?;
        Self::new(grid, palette)
    }

    /// The current encoded canvas.
    pub fn read(&self) -> Bytes {
        self.published.read().clone()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGBA value of one pixel in the live grid.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.grid.lock().get(x, y)
    }

    /// Check coordinates and color index without touching the canvas.
    pub fn validate(&self, x: i64, y: i64, color_index: i64) -> CanvasResult<Rgb> {
        let in_bounds =
            (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y);
        if !in_bounds {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        self.palette
            .get(color_index)
            .ok_or(CanvasError::InvalidColor {
                index: color_index,
                palette_len: self.palette.len(),
            })
    }

    /// Paint one pixel with a palette color and publish the new encoding.
    pub fn apply_pixel(&self, x: i64, y: i64, color_index: i64) -> CanvasResult<Bytes> {
        let color = self.validate(x, y, color_index)?;
        let (x, y) = (x as u32, y as u32);
        let rgba = color.to_rgba();

        let mut grid = self.grid.lock();
        let previous = grid.set(x, y, rgba).ok_or(CanvasError::OutOfBounds {
            x: x as i64,
            y: y as i64,
            width: self.width,
            height: self.height,
        })?;

        if previous == rgba {
            debug!(x, y, color = %color, "Pixel already has requested color");
            return Ok(self.read());
        }

        match (self.encoder)(&grid) {
            Ok(png) => {
                let encoded = Bytes::from(png);
                *self.published.write() = encoded.clone();
                Ok(encoded)
            }
            Err(e) => {
                grid.set(x, y, previous);
                error!(x, y, error = %e, "Canvas encode failed, placement rejected");
                Err(CanvasError::Codec(e))
            }
        }
    }
}
