//! The fixed color palette clients pick from when placing a pixel.
//!
//! A palette is loaded once from a JSON document holding an array of
//! `"#rrggbb"` strings. Clients address colors by their position in that
//! array, so the order of the document is the order of the palette.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// An opaque 8-bit-per-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string (case-insensitive, leading `#` optional).
    pub fn from_hex(s: &str) -> CanvasResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CanvasError::InvalidPalette(format!(
                "expected #rrggbb, got {:?}",
                s
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| CanvasError::InvalidPalette(format!("{:?}: {}", s, e)))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Lowercase `#rrggbb` representation.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// RGBA bytes with full opacity.
    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Ordered, immutable list of allowed colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }

    /// Load a palette from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CanvasError::InvalidPalette(format!("failed to read {:?}: {}", path, e))
        })?;
        Self::from_json(&content)
    }

    /// Parse a palette from a JSON array of hex strings.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a color by a client-supplied index.
    ///
    /// Negative and past-the-end indices both yield `None`.
    pub fn get(&self, index: i64) -> Option<Rgb> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.colors.get(i))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.colors.iter()
    }

    /// Colors as `#rrggbb` strings, in palette order.
    pub fn hex_strings(&self) -> Vec<String> {
        self.colors.iter().map(Rgb::to_hex).collect()
    }
}
