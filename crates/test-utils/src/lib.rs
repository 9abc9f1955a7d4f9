//! Shared test utilities for the canvas workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Canvas generators (blank and patterned PNGs)
//! - Palette fixtures
//! - Temporary history directories pre-filled with snapshots
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Assert that two RGBA grids differ in exactly the listed pixels.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_only_changed;
///
/// assert_only_changed!(&before, &after, [(1, 1)]);
/// ```
#[macro_export]
macro_rules! assert_only_changed {
    ($before:expr, $after:expr, [$(($x:expr, $y:expr)),* $(,)?]) => {{
        let before: &$crate::PixelGrid = $before;
        let after: &$crate::PixelGrid = $after;
        assert_eq!(before.width(), after.width(), "width changed");
        assert_eq!(before.height(), after.height(), "height changed");
        let expected: Vec<(u32, u32)> = vec![$(($x as u32, $y as u32)),*];
        let changed = $crate::changed_pixels(before, after);
        assert_eq!(
            changed, expected,
            "assertion failed: changed pixels\n  actual: `{:?}`,\n expected: `{:?}`",
            changed, expected
        );
    }};
}
