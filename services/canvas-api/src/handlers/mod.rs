//! HTTP handlers for the canvas service.

pub mod canvas;
pub mod health;
pub mod place;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use canvas_common::CanvasError;
use chrono::Utc;
use tracing::error;

/// Maps a [`CanvasError`] onto an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub CanvasError);

impl From<CanvasError> for ApiError {
    fn from(err: CanvasError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self.0 {
            CanvasError::RateLimited { retry_at } => {
                let remaining_ms = (*retry_at - Utc::now()).num_milliseconds();
                let retry_after_secs = ((remaining_ms + 999) / 1000).max(1);
                (status, [(header::RETRY_AFTER, retry_after_secs.to_string())]).into_response()
            }
            err if err.is_client_error() => (status, err.to_string()).into_response(),
            err => {
                error!(error = %err, "Request failed");
                (status, "Internal server error").into_response()
            }
        }
    }
}
