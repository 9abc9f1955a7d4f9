//! Prometheus metrics for the canvas service.
//!
//! Recording goes through the `metrics` facade; without an installed
//! recorder (e.g. in tests) every call is a no-op.

use canvas_common::{CanvasError, CanvasResult};
use metrics::{counter, gauge};

use crate::service::Placed;

/// Label for a placement outcome.
pub fn placement_outcome(result: &CanvasResult<Placed>) -> &'static str {
    match result {
        Ok(_) => "placed",
        Err(CanvasError::RateLimited { .. }) => "rate_limited",
        Err(CanvasError::OutOfBounds { .. }) => "out_of_bounds",
        Err(CanvasError::InvalidColor { .. }) => "invalid_color",
        Err(CanvasError::Codec(_)) => "codec_error",
        Err(_) => "error",
    }
}

/// Count a placement attempt by outcome.
pub fn record_placement(result: &CanvasResult<Placed>) {
    counter!("canvas_placements_total", "outcome" => placement_outcome(result)).increment(1);
}

/// Count a snapshot attempt.
pub fn record_snapshot(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    counter!("canvas_snapshots_total", "result" => result).increment(1);
}

/// Current size of the cooldown table.
pub fn record_cooldown_entries(entries: usize) {
    gauge!("cooldown_entries").set(entries as f64);
}

/// Record a cooldown sweep.
pub fn record_cooldown_sweep(evicted: usize, remaining: usize) {
    counter!("cooldown_entries_evicted_total").increment(evicted as u64);
    record_cooldown_entries(remaining);
}
