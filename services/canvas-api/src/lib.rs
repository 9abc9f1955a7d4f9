//! Shared pixel canvas service library.
//!
//! Any client may view the canvas and, subject to a per-identity cooldown,
//! change one pixel to a palette color. The pieces:
//! - [`canvas_store::CanvasStore`]: the single shared canvas and its published PNG
//! - [`rate_limit::RateLimiter`]: per-identity cooldowns
//! - [`service::CanvasService`]: placement orchestration
//! - [`archiver::HistoryArchiver`]: periodic snapshots and restore on startup

pub mod archiver;
pub mod canvas_store;
pub mod cleanup;
pub mod config;
pub mod handlers;
pub mod identity;
pub mod metrics;
pub mod rate_limit;
pub mod server;
pub mod service;
pub mod state;
