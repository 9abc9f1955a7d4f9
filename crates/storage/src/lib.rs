//! Durable storage for the canvas service.
//!
//! Canvas history lives on the local filesystem as one PNG per snapshot,
//! named by the UTC time it was taken. The newest snapshot is the recovery
//! source on restart.

pub mod history;

pub use history::{Snapshot, SnapshotEntry, SnapshotStore, SNAPSHOT_NAME_FORMAT};
