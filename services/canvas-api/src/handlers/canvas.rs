//! Canvas, palette and landing page handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Extension},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::state::AppState;

/// GET / - Landing page
pub async fn index_handler(
    Extension(state): Extension<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let identity = state.identity.resolve(peer, &headers);
    info!(identity = %identity, uri = "/", "access");

    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            warn!(path = ?path, error = %e, "Landing page not available");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// GET /canvas.png - Current canvas
pub async fn canvas_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        state.service.canvas(),
    )
}

/// GET /color_list.json - Palette as "#rrggbb" strings
pub async fn color_list_handler(
    Extension(state): Extension<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Json<Vec<String>> {
    let identity = state.identity.resolve(peer, &headers);
    info!(identity = %identity, uri = "/color_list.json", "access");

    Json(state.service.palette().hex_strings())
}

/// Anything else
pub async fn not_found_handler(
    Extension(state): Extension<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    uri: Uri,
) -> StatusCode {
    let identity = state.identity.resolve(peer, &headers);
    warn!(identity = %identity, uri = %uri, "access to unknown route");
    StatusCode::NOT_FOUND
}
