//! Placement orchestration.
//!
//! [`CanvasService`] is the one object the HTTP layer talks to. It owns the
//! canvas store and the cooldown table and decides, per
//! [`ReservationPolicy`], whether a request's cooldown is reserved before or
//! after its coordinates and color are checked.

use bytes::Bytes;
use canvas_common::{CanvasError, CanvasResult, Palette};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::canvas_store::CanvasStore;
use crate::metrics;
use crate::rate_limit::{RateLimiter, Reservation};

/// When the cooldown is reserved relative to request validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationPolicy {
    /// Reserve first; a rejected placement still consumes the identity's turn.
    #[default]
    ReserveFirst,
    /// Validate first; only well-formed placements consume a turn.
    ValidateFirst,
}

/// A single pixel placement as sent by a client.
///
/// Values are signed so that negative input reaches validation instead of
/// failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceRequest {
    pub x: i64,
    pub y: i64,
    pub index: i64,
}

/// Successful placement.
#[derive(Debug, Clone)]
pub struct Placed {
    /// Canvas encoding right after this placement.
    pub encoding: Bytes,
    /// When the identity may place again.
    pub next_allowed: DateTime<Utc>,
}

/// Canvas, cooldowns and the policy that ties them together.
pub struct CanvasService {
    store: CanvasStore,
    limiter: RateLimiter,
    policy: ReservationPolicy,
}

impl CanvasService {
    pub fn new(store: CanvasStore, limiter: RateLimiter, policy: ReservationPolicy) -> Self {
        Self {
            store,
            limiter,
            policy,
        }
    }

    /// Place one pixel on behalf of `identity`.
    ///
    /// A denied reservation returns `RateLimited` and leaves both the canvas
    /// and the cooldown untouched. Under `ReserveFirst`, a reservation that
    /// was granted is kept even if the placement is then rejected.
    pub fn place(
        &self,
        identity: &str,
        request: PlaceRequest,
        now: DateTime<Utc>,
    ) -> CanvasResult<Placed> {
        let result = self.place_inner(identity, request, now);
        metrics::record_placement(&result);
        result
    }

    fn place_inner(
        &self,
        identity: &str,
        request: PlaceRequest,
        now: DateTime<Utc>,
    ) -> CanvasResult<Placed> {
        let PlaceRequest { x, y, index } = request;

        if self.policy == ReservationPolicy::ValidateFirst {
            self.store.validate(x, y, index)?;
        }

        let next_allowed = match self.limiter.check_and_reserve(identity, now) {
            Reservation::Allowed { next_allowed } => {
                metrics::record_cooldown_entries(self.limiter.len());
                next_allowed
            }
            Reservation::Denied { retry_at } => {
                debug!(identity = %identity, retry_at = %retry_at, "Placement rate limited");
                return Err(CanvasError::RateLimited { retry_at });
            }
        };

        let encoding = self.store.apply_pixel(x, y, index)?;
        info!(identity = %identity, x, y, index, "Pixel placed");

        Ok(Placed {
            encoding,
            next_allowed,
        })
    }

    /// When `identity` may place next, if it is still cooling down.
    pub fn next_allowed(&self, identity: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.limiter.peek_next_allowed(identity, now)
    }

    /// The current encoded canvas.
    pub fn canvas(&self) -> Bytes {
        self.store.read()
    }

    pub fn palette(&self) -> &Palette {
        self.store.palette()
    }

    pub fn policy(&self) -> ReservationPolicy {
        self.policy
    }

    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}
