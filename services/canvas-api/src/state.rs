//! Application state shared by the HTTP handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use canvas_common::Palette;
use storage::SnapshotStore;

use crate::archiver::HistoryArchiver;
use crate::config::Config;
use crate::identity::IdentityResolver;
use crate::rate_limit::RateLimiter;
use crate::service::CanvasService;

/// Shared application state.
pub struct AppState {
    /// Canvas and cooldowns.
    pub service: Arc<CanvasService>,

    /// Identity resolution for rate limiting and access logs.
    pub identity: IdentityResolver,

    /// Directory holding index.html.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(service: Arc<CanvasService>, identity: IdentityResolver, static_dir: PathBuf) -> Self {
        Self {
            service,
            identity,
            static_dir,
        }
    }

    /// Load the palette, restore the newest snapshot and assemble the state.
    ///
    /// Any failure here is fatal: without a palette or a canvas there is
    /// nothing to serve.
    pub fn from_config(config: &Config) -> Result<(Self, Arc<HistoryArchiver>)> {
        let palette = Palette::from_file(&config.palette)
            .with_context(|| format!("Failed to load palette {:?}", config.palette))?;
        if palette.is_empty() {
            tracing::warn!(path = ?config.palette, "Palette is empty, every placement will be rejected");
        }
        tracing::info!(colors = palette.len(), "Palette loaded");

        let archiver = Arc::new(HistoryArchiver::new(
            SnapshotStore::new(&config.history_dir),
            config.snapshot_interval(),
        ));
        let canvas = archiver
            .restore_canvas(palette)
            .with_context(|| format!("Failed to restore canvas from {:?}", config.history_dir))?;

        let service = Arc::new(CanvasService::new(
            canvas,
            RateLimiter::new(config.cooldown()),
            config.reservation_policy,
        ));
        let identity =
            IdentityResolver::new(config.trusted_proxies.clone(), &config.forwarded_header)?;

        Ok((
            Self::new(service, identity, config.static_dir.clone()),
            archiver,
        ))
    }
}
