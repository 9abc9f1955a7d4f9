//! Cooldown table cleanup background task.
//!
//! Every identity that ever placed leaves an entry in the cooldown table.
//! This task periodically evicts entries that expired long enough ago that
//! keeping them changes nothing.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::metrics;
use crate::service::CanvasService;

/// Configuration for the cooldown sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Whether the sweep runs at all
    pub enabled: bool,
    /// How often to sweep
    pub interval: Duration,
    /// How long past expiry an entry is kept
    pub grace: chrono::Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(600),
            grace: chrono::Duration::seconds(60),
        }
    }
}

/// Run one sweep and record the result. Returns the number evicted.
pub fn sweep_once(service: &CanvasService, grace: chrono::Duration) -> usize {
    let limiter = service.limiter();
    let evicted = limiter.sweep(Utc::now(), grace);
    let remaining = limiter.len();

    metrics::record_cooldown_sweep(evicted, remaining);
    if evicted > 0 {
        info!(evicted, remaining, "Evicted expired cooldown entries");
    } else {
        debug!(remaining, "Cooldown sweep found nothing to evict");
    }
    evicted
}

/// Sweep the cooldown table on a fixed period until shutdown.
pub async fn run_cooldown_sweep(
    service: Arc<CanvasService>,
    config: SweepConfig,
    mut shutdown: broadcast::Receiver<()>,
) {
    if !config.enabled {
        info!("Cooldown sweep disabled");
        return;
    }

    let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        interval_secs = config.interval.as_secs(),
        grace_secs = config.grace.num_seconds(),
        "Cooldown sweep task started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sweep_once(&service, config.grace);
            }
            _ = shutdown.recv() => {
                info!("Cooldown sweep task stopping");
                break;
            }
        }
    }
}
