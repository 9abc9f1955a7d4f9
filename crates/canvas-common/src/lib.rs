//! Common types shared across the canvas crates and services.

pub mod error;
pub mod palette;

pub use error::{CanvasError, CanvasResult};
pub use palette::{Palette, Rgb};
