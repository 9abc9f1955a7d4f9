//! Router construction and the serve/shutdown lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{extract::Extension, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::archiver::HistoryArchiver;
use crate::cleanup::{self, SweepConfig};
use crate::handlers;
use crate::state::AppState;

/// Create the canvas API router.
///
/// Handlers need `ConnectInfo<SocketAddr>`; serve the router with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_router(state: Arc<AppState>, prometheus: Option<PrometheusHandle>) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::canvas::index_handler))
        .route("/canvas.png", get(handlers::canvas::canvas_handler))
        .route("/color_list.json", get(handlers::canvas::color_list_handler))
        .route("/interval", get(handlers::place::interval_handler))
        .route("/place", get(handlers::place::place_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .fallback(handlers::canvas::not_found_handler)
        .layer(Extension(state));

    if let Some(handle) = prometheus {
        app = app.layer(Extension(handle));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Received shutdown signal");
}

/// Serve until `shutdown` resolves, then stop background tasks and take a
/// final snapshot.
///
/// The final snapshot runs whether the server exited cleanly or not.
pub async fn run(
    listener: tokio::net::TcpListener,
    state: Arc<AppState>,
    archiver: Arc<HistoryArchiver>,
    sweep: SweepConfig,
    prometheus: Option<PrometheusHandle>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let service = state.service.clone();
    let (stop_tx, _) = broadcast::channel::<()>(1);

    let snapshot_task = tokio::spawn(
        archiver
            .clone()
            .run(service.clone(), stop_tx.subscribe()),
    );
    let sweep_task = tokio::spawn(cleanup::run_cooldown_sweep(
        service.clone(),
        sweep,
        stop_tx.subscribe(),
    ));

    let app = create_router(state, prometheus);
    info!(address = ?listener.local_addr().ok(), "HTTP server listening");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await;

    if let Err(e) = &served {
        error!(error = %e, "HTTP server failed");
    }

    stop_tx.send(()).ok();
    for task in [snapshot_task, sweep_task] {
        if let Err(e) = task.await {
            error!(error = %e, "Background task panicked");
        }
    }

    info!("Taking shutdown snapshot");
    archiver.snapshot_canvas(&service).await;

    served.map_err(Into::into)
}
