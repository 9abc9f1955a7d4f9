//! Canvas API Server
//!
//! Serves the shared pixel canvas, enforces per-identity cooldowns and keeps
//! a timestamped history of the canvas on disk.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use canvas_api::config::Config;
use canvas_api::server;
use canvas_api::state::AppState;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = config.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(config))
}

async fn run_server(config: Config) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!(
        palette = ?config.palette,
        history_dir = ?config.history_dir,
        cooldown_secs = config.cooldown_secs,
        snapshot_interval_secs = config.snapshot_interval_secs,
        policy = ?config.reservation_policy,
        "Starting canvas API server"
    );

    // Palette and canvas are required; failing here means nothing is served
    let (state, archiver) = AppState::from_config(&config)?;

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    server::run(
        listener,
        Arc::new(state),
        archiver,
        config.sweep(),
        Some(prometheus_handle),
        server::shutdown_signal(),
    )
    .await
}
