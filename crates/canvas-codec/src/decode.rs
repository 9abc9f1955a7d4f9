//! PNG decoding for restored snapshots.

use image::ImageFormat;
use tracing::debug;

use crate::grid::PixelGrid;

/// Decode a PNG into an RGBA grid.
///
/// Any PNG color type is accepted and converted to 8-bit RGBA, so snapshots
/// written by other tools restore the same way as our own.
pub fn decode_png(bytes: &[u8]) -> Result<PixelGrid, String> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| format!("PNG decode failed: {}", e))?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(width, height, bytes = bytes.len(), "Decoded canvas PNG");

    PixelGrid::from_rgba(width, height, rgba.into_raw())
        .ok_or_else(|| format!("decoded buffer does not match {}x{}", width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_png(b"definitely not a png").is_err());
        assert!(decode_png(&[]).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let grid = PixelGrid::filled(4, 4, canvas_common::Rgb::WHITE);
        let png = crate::encode_png(&grid).unwrap();
        assert!(decode_png(&png[..png.len() / 2]).is_err());
    }
}
