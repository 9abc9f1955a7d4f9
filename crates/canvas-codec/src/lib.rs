//! Raster codec for the shared canvas.
//!
//! The canvas lives in memory as an RGBA [`PixelGrid`] and is published to
//! clients as PNG. Encoding is done by hand (indexed PNG when the canvas has
//! at most 256 colors, RGBA otherwise); decoding of restored snapshots goes
//! through the `image` crate so any PNG a previous run wrote can be read.

pub mod decode;
pub mod grid;
pub mod png;

pub use decode::decode_png;
pub use grid::PixelGrid;
pub use png::encode_png;
