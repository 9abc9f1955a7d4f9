//! Canvas history: restore on startup, periodic snapshots while running.
//!
//! The archiver only ever reads the canvas. Each snapshot takes a copy of the
//! published PNG and writes it on the blocking pool, so a slow disk never
//! holds a canvas lock.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use canvas_common::{CanvasError, CanvasResult, Palette};
use chrono::{DateTime, Utc};
use storage::SnapshotStore;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::canvas_store::CanvasStore;
use crate::metrics;
use crate::service::CanvasService;

/// Periodic snapshot writer and startup restorer.
pub struct HistoryArchiver {
    store: SnapshotStore,
    interval: Duration,
}

impl HistoryArchiver {
    pub fn new(store: SnapshotStore, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn snapshot_store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Encoding of the newest snapshot.
    pub fn restore_latest(&self) -> CanvasResult<Bytes> {
        let snapshot = self.store.latest()?;
        info!(
            path = ?snapshot.entry.path,
            taken_at = %snapshot.entry.taken_at,
            bytes = snapshot.data.len(),
            "Restoring canvas from snapshot"
        );
        Ok(snapshot.data)
    }

    /// Decode the newest snapshot into a live canvas store.
    pub fn restore_canvas(&self, palette: Palette) -> CanvasResult<CanvasStore> {
        let encoding = self.restore_latest()?;
        let canvas = CanvasStore::from_encoded(&encoding, palette)?;
        info!(
            width = canvas.width(),
            height = canvas.height(),
            "Canvas restored"
        );
        Ok(canvas)
    }

    /// Write `encoding` as the snapshot for time `at`.
    pub async fn snapshot_now(&self, encoding: Bytes, at: DateTime<Utc>) -> CanvasResult<PathBuf> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.write(&encoding, at))
            .await
            .map_err(|e| CanvasError::Storage(format!("snapshot task failed: {}", e)))?
    }

    /// Snapshot the service's current canvas, logging the outcome.
    ///
    /// Failures are not propagated; the next attempt is unaffected.
    pub async fn snapshot_canvas(&self, service: &CanvasService) -> Option<PathBuf> {
        let encoding = service.canvas();
        match self.snapshot_now(encoding, Utc::now()).await {
            Ok(path) => {
                info!(path = ?path, "Canvas has been saved");
                metrics::record_snapshot(true);
                Some(path)
            }
            Err(e) => {
                error!(dir = ?self.store.dir(), error = %e, "Failed to save canvas snapshot");
                metrics::record_snapshot(false);
                None
            }
        }
    }

    /// Snapshot every `interval` until a shutdown signal arrives.
    ///
    /// The first snapshot is taken one full interval after start. The final
    /// shutdown snapshot is the caller's job, after the HTTP server drains.
    pub async fn run(
        self: Arc<Self>,
        service: Arc<CanvasService>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = self.interval.as_secs(), "Snapshot task started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.snapshot_canvas(&service).await;
                }
                _ = shutdown.recv() => {
                    info!("Snapshot task stopping");
                    break;
                }
            }
        }
    }
}
