//! Per-identity placement cooldowns.
//!
//! Each identity maps to the earliest instant it may place again. The
//! check and the reservation happen under one lock, so two concurrent
//! requests from the same identity can never both pass.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Outcome of [`RateLimiter::check_and_reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// The identity may place; its cooldown now runs until `next_allowed`.
    Allowed { next_allowed: DateTime<Utc> },
    /// The identity is cooling down until `retry_at`. Nothing was recorded.
    Denied { retry_at: DateTime<Utc> },
}

impl Reservation {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Reservation::Allowed { .. })
    }
}

/// Cooldown table keyed by identity.
pub struct RateLimiter {
    interval: Duration,
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reserve the identity's next turn if its cooldown has passed.
    ///
    /// A recorded instant at or before `now` counts as expired.
    pub fn check_and_reserve(&self, identity: &str, now: DateTime<Utc>) -> Reservation {
        let mut entries = self.entries.lock();

        if let Some(&retry_at) = entries.get(identity) {
            if retry_at > now {
                return Reservation::Denied { retry_at };
            }
        }

        // Saturates at the end of the representable range
        let next_allowed = now
            .checked_add_signed(self.interval)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        entries.insert(identity.to_string(), next_allowed);
        Reservation::Allowed { next_allowed }
    }

    /// The identity's next allowed instant, if it is still in the future.
    pub fn peek_next_allowed(&self, identity: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.entries
            .lock()
            .get(identity)
            .copied()
            .filter(|&next_allowed| next_allowed > now)
    }

    /// Drop entries that expired more than `grace` before `now`.
    ///
    /// An evicted identity is indistinguishable from one that never placed.
    /// Returns the number of entries removed.
    pub fn sweep(&self, now: DateTime<Utc>, grace: Duration) -> usize {
        let cutoff = now
            .checked_sub_signed(grace)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, next_allowed| *next_allowed >= cutoff);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
