//! PNG encoding for the canvas.
//!
//! A palette-restricted canvas almost always has far fewer than 256 distinct
//! colors, so the encoder first tries to build a color table:
//! - **Indexed PNG (color type 3)**: one byte per pixel plus a PLTE chunk.
//! - **RGBA PNG (color type 6)**: fallback once more than 256 colors appear
//!   (possible when a restored snapshot was drawn outside the palette).

use std::collections::HashMap;
use std::io::Write;

use rayon::prelude::*;

use crate::grid::PixelGrid;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_TABLE_SIZE: usize = 256;

/// Pixel count above which index mapping is spread across the rayon pool.
const PARALLEL_THRESHOLD: usize = 64 * 64;

/// Encode a pixel grid as PNG, choosing indexed or RGBA automatically.
pub fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>, String> {
    let width = grid.width() as usize;
    let height = grid.height() as usize;
    if width == 0 || height == 0 {
        return Err(format!("cannot encode an empty {}x{} canvas", width, height));
    }

    match build_color_table(grid.as_rgba()) {
        Some((table, indices)) => encode_indexed(width, height, &table, &indices),
        None => encode_rgba(grid.as_rgba(), width, height),
    }
}

#[inline(always)]
fn pack(rgba: &[u8]) -> u32 {
    u32::from_le_bytes([rgba[0], rgba[1], rgba[2], rgba[3]])
}

/// Collect the distinct colors of an RGBA buffer and map every pixel to its
/// table slot. Returns `None` when the buffer holds more than 256 colors.
fn build_color_table(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut slots: HashMap<u32, u8> = HashMap::with_capacity(MAX_TABLE_SIZE);
    let mut table: Vec<[u8; 4]> = Vec::with_capacity(MAX_TABLE_SIZE);

    for px in pixels.chunks_exact(4) {
        let key = pack(px);
        if slots.contains_key(&key) {
            continue;
        }
        if table.len() == MAX_TABLE_SIZE {
            return None;
        }
        slots.insert(key, table.len() as u8);
        table.push([px[0], px[1], px[2], px[3]]);
    }

    let lookup = |px: &[u8]| slots.get(&pack(px)).copied().unwrap_or(0);
    let indices: Vec<u8> = if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        pixels.par_chunks_exact(4).map(lookup).collect()
    } else {
        pixels.chunks_exact(4).map(lookup).collect()
    };

    Some((table, indices))
}

/// Create an indexed PNG (color type 3) from a color table and indices.
fn encode_indexed(
    width: usize,
    height: usize,
    table: &[[u8; 4]],
    indices: &[u8],
) -> Result<Vec<u8>, String> {
    let mut png = Vec::with_capacity(64 + table.len() * 4 + indices.len() / 4);
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &header(width, height, 3));

    let plte: Vec<u8> = table.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // tRNS only if some entry is not fully opaque
    if table.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = table.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width, height)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create an RGBA PNG (color type 6).
fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &header(width, height, 6));

    let idat = deflate_scanlines(pixels, width * 4, height)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn header(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(color_type);
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    ihdr
}

/// Prefix each scanline with filter type 0 and zlib-compress the result.
fn deflate_scanlines(
    data: &[u8],
    row_bytes: usize,
    height: usize,
) -> Result<Vec<u8>, std::io::Error> {
    let mut raw = Vec::with_capacity(height * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&raw)?;
    encoder.finish()
}

/// Append a length-prefixed, CRC-suffixed chunk.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
