//! Error types for the canvas services.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias using CanvasError.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Primary error type for canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    // === Request Errors ===
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("Color index {index} is not in the palette ({palette_len} colors)")]
    InvalidColor { index: i64, palette_len: usize },

    #[error("Rate limited until {retry_at}")]
    RateLimited { retry_at: DateTime<Utc> },

    // === Canvas Errors ===
    #[error("Canvas codec error: {0}")]
    Codec(String),

    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    // === Storage Errors ===
    #[error("No snapshot found in {0:?}")]
    NoSnapshotFound(PathBuf),

    #[error("Storage error: {0}")]
    Storage(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl CanvasError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            CanvasError::InvalidRequest(_)
            | CanvasError::OutOfBounds { .. }
            | CanvasError::InvalidColor { .. } => 400,

            CanvasError::RateLimited { .. } => 429,

            _ => 500,
        }
    }

    /// Whether the error was caused by the client rather than the server.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }
}

// Conversion from common error types
impl From<std::io::Error> for CanvasError {
    fn from(err: std::io::Error) -> Self {
        CanvasError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        CanvasError::InvalidPalette(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CanvasError::InvalidRequest("x".into()).http_status_code(), 400);
        assert_eq!(
            CanvasError::OutOfBounds {
                x: 5,
                y: 0,
                width: 3,
                height: 3
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            CanvasError::InvalidColor {
                index: 2,
                palette_len: 2
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            CanvasError::RateLimited {
                retry_at: Utc::now()
            }
            .http_status_code(),
            429
        );
        assert_eq!(CanvasError::Codec("bad".into()).http_status_code(), 500);
        assert_eq!(CanvasError::Storage("disk".into()).http_status_code(), 500);
        assert_eq!(CanvasError::Internal("join".into()).http_status_code(), 500);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(CanvasError::InvalidRequest("x".into()).is_client_error());
        assert!(!CanvasError::Codec("bad".into()).is_client_error());
        assert!(!CanvasError::NoSnapshotFound(PathBuf::from("history")).is_client_error());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: CanvasError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CanvasError::Storage(_)));
    }
}
