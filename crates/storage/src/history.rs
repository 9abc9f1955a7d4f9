//! Timestamped canvas snapshots on disk.
//!
//! ## Layout
//!
//! ```text
//! history/
//!   20230101-10_00_00.png
//!   20230102-09_00_00.png
//! ```
//!
//! Files are discovered recursively. Only `.png` files whose stem parses with
//! [`SNAPSHOT_NAME_FORMAT`] take part in ordering; anything else is skipped
//! with a warning.

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use canvas_common::{CanvasError, CanvasResult};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// chrono format of a snapshot file stem, second resolution.
pub const SNAPSHOT_NAME_FORMAT: &str = "%Y%m%d-%H_%M_%S";

const SNAPSHOT_EXTENSION: &str = "png";

/// How many of the newest snapshots are logged on restore.
const LOGGED_HISTORY: usize = 10;

/// A snapshot file and the time encoded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub path: PathBuf,
    pub taken_at: DateTime<Utc>,
}

/// A snapshot loaded into memory.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub entry: SnapshotEntry,
    pub data: Bytes,
}

/// Directory of canvas snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a snapshot taken at `at`.
    pub fn file_name(at: DateTime<Utc>) -> String {
        format!("{}.{}", at.format(SNAPSHOT_NAME_FORMAT), SNAPSHOT_EXTENSION)
    }

    /// Parse the timestamp out of a snapshot path.
    pub fn parse_name(path: &Path) -> Option<DateTime<Utc>> {
        if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let naive = NaiveDateTime::parse_from_str(stem, SNAPSHOT_NAME_FORMAT).ok()?;
        Some(Utc.from_utc_datetime(&naive))
    }

    /// All parseable snapshots, newest first.
    ///
    /// A missing directory is an empty history, not an error.
    pub fn list(&self) -> CanvasResult<Vec<SnapshotEntry>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for item in WalkDir::new(&self.dir) {
            let item = item.map_err(|e| {
                CanvasError::Storage(format!("failed to scan {:?}: {}", self.dir, e))
            })?;
            if !item.file_type().is_file() {
                continue;
            }

            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            match Self::parse_name(path) {
                Some(taken_at) => entries.push(SnapshotEntry {
                    path: path.to_path_buf(),
                    taken_at,
                }),
                None => warn!(path = ?path, "Skipping snapshot with unparseable name"),
            }
        }

        entries.sort_by(|a, b| {
            b.taken_at
                .cmp(&a.taken_at)
                .then_with(|| b.path.cmp(&a.path))
        });
        Ok(entries)
    }

    /// Load the newest snapshot.
    pub fn latest(&self) -> CanvasResult<Snapshot> {
        let entries = self.list()?;

        info!(
            dir = ?self.dir,
            total = entries.len(),
            "Snapshot history (newest {})",
            LOGGED_HISTORY
        );
        for entry in entries.iter().take(LOGGED_HISTORY) {
            info!(name = ?entry.path.file_name(), taken_at = %entry.taken_at, "  snapshot");
        }

        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| CanvasError::NoSnapshotFound(self.dir.clone()))?;

        let data = fs::read(&entry.path).map_err(|e| {
            CanvasError::Storage(format!("failed to read {:?}: {}", entry.path, e))
        })?;

        Ok(Snapshot {
            entry,
            data: Bytes::from(data),
        })
    }

    /// Write `data` as the snapshot for time `at`.
    ///
    /// The bytes land in a temporary sibling first and are renamed into
    /// place, so the history never holds a truncated image. A snapshot
    /// already present for the same second is replaced.
    pub fn write(&self, data: &[u8], at: DateTime<Utc>) -> CanvasResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            CanvasError::Storage(format!("failed to create {:?}: {}", self.dir, e))
        })?;

        let name = Self::file_name(at);
        let path = self.dir.join(&name);
        let tmp = self.dir.join(format!("{}.tmp", name));

        fs::write(&tmp, data)
            .map_err(|e| CanvasError::Storage(format!("failed to write {:?}: {}", tmp, e)))?;
        fs::rename(&tmp, &path).map_err(|e| {
            CanvasError::Storage(format!("failed to move {:?} into place: {}", tmp, e))
        })?;

        debug!(path = ?path, bytes = data.len(), "Snapshot written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_format() {
        let at = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(SnapshotStore::file_name(at), "20060102-15_04_05.png");
    }

    #[test]
    fn test_parse_name() {
        let parsed = SnapshotStore::parse_name(Path::new("history/20060102-15_04_05.png"));
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()));
    }

    #[test]
    fn test_parse_name_rejects_other_files() {
        assert!(SnapshotStore::parse_name(Path::new("20060102-15_04_05.jpg")).is_none());
        assert!(SnapshotStore::parse_name(Path::new("canvas.png")).is_none());
        assert!(SnapshotStore::parse_name(Path::new("20060102-15_04_05.png.tmp")).is_none());
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let store = SnapshotStore::new("/nonexistent/canvas/history");
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(
            store.latest(),
            Err(CanvasError::NoSnapshotFound(_))
        ));
    }
}
