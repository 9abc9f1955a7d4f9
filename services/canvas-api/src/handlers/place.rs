//! Pixel placement and cooldown handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Extension, Query},
    http::{HeaderMap, StatusCode},
};
use canvas_common::{CanvasError, CanvasResult};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use super::ApiError;
use crate::service::PlaceRequest;
use crate::state::AppState;

/// Query parameters for /place.
///
/// Kept as raw strings so that a missing or non-numeric value becomes a
/// plain 400 instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PlaceParams {
    pub x: Option<String>,
    pub y: Option<String>,
    pub index: Option<String>,
}

impl PlaceParams {
    pub fn parse(&self) -> CanvasResult<PlaceRequest> {
        let arg = |value: &Option<String>| -> CanvasResult<i64> {
            value
                .as_deref()
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(|| CanvasError::InvalidRequest("Missing arguments".to_string()))
        };

        Ok(PlaceRequest {
            x: arg(&self.x)?,
            y: arg(&self.y)?,
            index: arg(&self.index)?,
        })
    }
}

/// GET /place?x=&y=&index= - Place one pixel
pub async fn place_handler(
    Extension(state): Extension<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(params): Query<PlaceParams>,
) -> Result<StatusCode, ApiError> {
    let identity = state.identity.resolve(peer, &headers);
    let request = params.parse().map_err(|e| {
        debug!(identity = %identity, params = ?params, "Rejected malformed placement");
        e
    })?;

    let service = state.service.clone();
    tokio::task::spawn_blocking(move || service.place(&identity, request, Utc::now()))
        .await
        .map_err(|e| CanvasError::Internal(format!("placement task failed: {}", e)))??;

    Ok(StatusCode::OK)
}

/// GET /interval - Remaining cooldown as epoch milliseconds, empty if unlocked
pub async fn interval_handler(
    Extension(state): Extension<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> String {
    let identity = state.identity.resolve(peer, &headers);

    state
        .service
        .next_allowed(&identity, Utc::now())
        .map(|next_allowed| next_allowed.timestamp_millis().to_string())
        .unwrap_or_default()
}
