//! Tests for the snapshot history store.
//!
//! These run against temporary directories and cover:
//! - Newest-first ordering by the timestamp in the file name
//! - Skipping of foreign and unparseable files
//! - Atomic writes and directory creation

use canvas_common::CanvasError;
use storage::SnapshotStore;
use test_utils::{blank_canvas_png, snapshot_time, HistoryFixture};

// ============================================================================
// Restore tests
// ============================================================================

#[test]
fn test_latest_picks_newest_timestamp() {
    let history = HistoryFixture::empty();
    history.add("20230102-09_00_00.png", b"newer");
    history.add("20230101-10_00_00.png", b"older");

    let store = SnapshotStore::new(history.path());
    let latest = store.latest().unwrap();

    assert_eq!(latest.entry.taken_at, snapshot_time("20230102-09_00_00"));
    assert_eq!(&latest.data[..], b"newer");
}

#[test]
fn test_ordering_uses_timestamp_not_file_order() {
    let history = HistoryFixture::empty();
    // Lexically "b/" sorts after "a/" but holds the older snapshot
    history.add("a/20240301-00_00_01.png", b"march");
    history.add("b/20231231-23_59_59.png", b"december");

    let store = SnapshotStore::new(history.path());
    let entries = store.list().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].taken_at, snapshot_time("20240301-00_00_01"));
    assert_eq!(entries[1].taken_at, snapshot_time("20231231-23_59_59"));
}

#[test]
fn test_foreign_files_are_skipped() {
    let history = HistoryFixture::empty();
    history.add("20230101-10_00_00.png", b"valid");
    history.add("notes.txt", b"ignored");
    history.add("backup.png", b"unparseable name");
    history.add("20990101-00_00_00.png.tmp", b"interrupted write");

    let store = SnapshotStore::new(history.path());
    let entries = store.list().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(&store.latest().unwrap().data[..], b"valid");
}

#[test]
fn test_empty_history_is_no_snapshot_found() {
    let history = HistoryFixture::empty();
    let store = SnapshotStore::new(history.path());

    match store.latest() {
        Err(CanvasError::NoSnapshotFound(dir)) => assert_eq!(dir, history.path()),
        other => panic!("expected NoSnapshotFound, got {:?}", other),
    }
}

// ============================================================================
// Write tests
// ============================================================================

#[test]
fn test_write_then_restore() {
    let history = HistoryFixture::empty();
    let store = SnapshotStore::new(history.path());
    let png = blank_canvas_png(5, 5);

    let path = store
        .write(&png, snapshot_time("20240615-12_30_45"))
        .unwrap();

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("20240615-12_30_45.png")
    );
    assert_eq!(&store.latest().unwrap().data[..], &png[..]);
}

#[test]
fn test_write_creates_missing_directory() {
    let history = HistoryFixture::empty();
    let store = SnapshotStore::new(history.path().join("nested").join("history"));

    store
        .write(b"canvas", snapshot_time("20240101-00_00_00"))
        .unwrap();

    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_write_leaves_no_temp_files() {
    let history = HistoryFixture::empty();
    let store = SnapshotStore::new(history.path());
    store
        .write(b"canvas", snapshot_time("20240101-00_00_00"))
        .unwrap();

    let names: Vec<String> = std::fs::read_dir(history.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["20240101-00_00_00.png".to_string()]);
}

#[test]
fn test_same_second_write_replaces() {
    let history = HistoryFixture::empty();
    let store = SnapshotStore::new(history.path());
    let at = snapshot_time("20240101-00_00_00");

    store.write(b"first", at).unwrap();
    store.write(b"second", at).unwrap();

    assert_eq!(store.list().unwrap().len(), 1);
    assert_eq!(&store.latest().unwrap().data[..], b"second");
}

#[test]
fn test_newer_write_becomes_latest() {
    let history = HistoryFixture::with_blank_canvas(2, 2);
    let store = SnapshotStore::new(history.path());

    store
        .write(b"fresh", snapshot_time("20300101-00_00_00"))
        .unwrap();

    assert_eq!(&store.latest().unwrap().data[..], b"fresh");
}
