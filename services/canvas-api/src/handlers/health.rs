//! Health and metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub width: u32,
    pub height: u32,
    pub palette_size: usize,
    pub cooldown_entries: usize,
}

/// GET /health - Basic health check
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    let service = &state.service;
    let (width, height) = service.store().dimensions();

    Json(HealthResponse {
        status: "ok".to_string(),
        width,
        height,
        palette_size: service.palette().len(),
        cooldown_entries: service.limiter().len(),
    })
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(prometheus: Option<Extension<PrometheusHandle>>) -> Response {
    match prometheus {
        Some(Extension(handle)) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}
