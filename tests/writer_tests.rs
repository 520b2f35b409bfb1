//! Tests for the transactional writer
//!
//! These tests verify:
//! - Appending synthesized records
//! - Removing existing records
//! - Replacing records in place
//! - State transitions and misuse errors
//! - Flush on close and its interaction with the reload cache

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use featurestore::codec::{BinaryCodec, RecordCodec};
use featurestore::feature::{Coord, Geometry};
use featurestore::schema::SchemaDeriver;
use featurestore::store::WriterState;
use featurestore::{FeatureStore, Record, RecordId, StoreError, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn placemark(id: &str, name: &str) -> Record {
    let schema = SchemaDeriver::template_record().unwrap().record_type();
    let mut record = Record::blank(&schema, RecordId::new(id));
    record.set("name", Value::Text(name.to_string())).unwrap();
    record
}

fn write_records(path: &Path, records: &[Record]) {
    let file = File::create(path).unwrap();
    let mut writer = BufWriter::new(file);
    BinaryCodec.encode_all(records, &mut writer).unwrap();
}

fn read_file(path: &Path) -> Vec<Record> {
    let file = File::open(path).unwrap();
    BinaryCodec.decode_all(&mut BufReader::new(file)).unwrap()
}

fn setup_empty_store() -> (TempDir, PathBuf, FeatureStore) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("places.fstore");
    let store = FeatureStore::open_path(&path).unwrap();
    (temp_dir, path, store)
}

fn setup_store_with(records: &[Record]) -> (TempDir, PathBuf, FeatureStore) {
    let (temp_dir, path, _) = setup_empty_store();
    write_records(&path, records);
    let store = FeatureStore::open_path(&path).unwrap();
    (temp_dir, path, store)
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_to_empty_store() {
    let (_temp, path, mut store) = setup_empty_store();

    let mut writer = store.writer().unwrap();
    assert!(!writer.has_next());

    let record = writer.next().unwrap();
    assert!(record.attributes().iter().all(|a| a.value.is_none()));
    record.set("name", Value::Text("Harbour".to_string())).unwrap();
    record
        .set("geometry", Value::Geometry(Geometry::Point(Coord::new(4.3, 52.0))))
        .unwrap();
    assert!(matches!(writer.state(), WriterState::Synthesized(_)));

    writer.write().unwrap();
    writer.close().unwrap();

    assert!(path.exists());

    let mut reader = store.reader().unwrap();
    let records = reader.collect_remaining();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name"), Some(&Value::Text("Harbour".to_string())));
    assert_eq!(read_file(&path), records);
}

#[test]
fn test_synthesized_records_get_fresh_ids() {
    let (_temp, _path, mut store) = setup_empty_store();

    let mut writer = store.writer().unwrap();
    let first = writer.next().unwrap().id().clone();
    writer.write().unwrap();
    let second = writer.next().unwrap().id().clone();
    writer.write().unwrap();
    writer.close().unwrap();

    assert_ne!(first, second);
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn test_blank_record_conforms_to_schema() {
    let (_temp, _path, mut store) = setup_empty_store();
    let schema = store.schema();

    let mut writer = store.writer().unwrap();
    let record = writer.next().unwrap();
    assert!(schema.accepts(record));
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_existing_record() {
    let (_temp, path, mut store) =
        setup_store_with(&[placemark("a", "X"), placemark("b", "Y"), placemark("c", "Z")]);
    let before = store.count().unwrap();

    let mut writer = store.writer().unwrap();
    writer.next().unwrap();
    let target = writer.next().unwrap().id().clone();
    assert!(matches!(writer.state(), WriterState::Scanning { .. }));
    writer.remove().unwrap();
    assert_eq!(writer.state(), &WriterState::Committed);
    writer.close().unwrap();

    assert_eq!(target.as_str(), "b");
    assert_eq!(store.count().unwrap(), before - 1);

    let remaining = store.reader().unwrap().collect_remaining();
    assert!(remaining.iter().all(|r| r.id() != &target));
    assert_eq!(read_file(&path), remaining);
}

#[test]
fn test_remove_after_id_change_removes_original() {
    let (_temp, path, mut store) = setup_store_with(&[placemark("a", "X"), placemark("b", "Y")]);

    let mut writer = store.writer().unwrap();
    writer.next().unwrap().set_id("b");
    writer.remove().unwrap();
    writer.close().unwrap();

    let ids: Vec<_> = read_file(&path).iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, vec!["b"]);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_remove_without_current_fails() {
    let (_temp, _path, mut store) = setup_store_with(&[placemark("a", "X")]);

    let mut writer = store.writer().unwrap();
    assert!(matches!(writer.remove(), Err(StoreError::NoCurrentRecord)));

    writer.next().unwrap();
    writer.remove().unwrap();
    assert!(matches!(writer.remove(), Err(StoreError::NoCurrentRecord)));
}

#[test]
fn test_write_without_current_fails() {
    let (_temp, _path, mut store) = setup_empty_store();

    let mut writer = store.writer().unwrap();
    assert!(matches!(writer.write(), Err(StoreError::NoCurrentRecord)));

    writer.next().unwrap();
    writer.write().unwrap();
    assert!(matches!(writer.write(), Err(StoreError::NoCurrentRecord)));
}

// =============================================================================
// Update Tests
// =============================================================================

#[test]
fn test_write_existing_record_replaces_in_place() {
    let (_temp, _path, mut store) = setup_store_with(&[placemark("a", "X"), placemark("b", "Y")]);

    let mut writer = store.writer().unwrap();
    let record = writer.next().unwrap();
    record.set("name", Value::Text("X2".to_string())).unwrap();
    writer.write().unwrap();
    writer.close().unwrap();

    let records = store.reader().unwrap().collect_remaining();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id().as_str(), "a");
    assert_eq!(records[0].get("name"), Some(&Value::Text("X2".to_string())));
}

#[test]
fn test_renamed_record_replaces_its_original() {
    let (_temp, path, mut store) = setup_store_with(&[placemark("a", "X"), placemark("b", "Y")]);

    let mut writer = store.writer().unwrap();
    writer.next().unwrap().set_id("a2");
    writer.write().unwrap();
    writer.close().unwrap();

    let ids: Vec<_> = read_file(&path).iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, vec!["a2", "b"]);
}

#[test]
fn test_untouched_records_survive_close() {
    let (_temp, path, mut store) = setup_store_with(&[placemark("a", "X"), placemark("b", "Y")]);

    let mut writer = store.writer().unwrap();
    while writer.has_next() {
        writer.next().unwrap();
    }
    writer.close().unwrap();

    assert_eq!(read_file(&path).len(), 2);
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_close_makes_next_reload_a_cache_hit() {
    let (_temp, _path, mut store) = setup_store_with(&[placemark("a", "X")]);

    let mut writer = store.writer().unwrap();
    writer.next().unwrap();
    writer.remove().unwrap();
    writer.close().unwrap();
    let reloads = store.reload_count();

    store.ensure_fresh().unwrap();
    store.reader().unwrap();

    assert_eq!(store.reload_count(), reloads);
}

#[test]
fn test_dropped_writer_does_not_flush() {
    let (_temp, path, mut store) = setup_empty_store();

    {
        let mut writer = store.writer().unwrap();
        writer.next().unwrap();
        writer.write().unwrap();
    }

    assert!(!path.exists());
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_failed_flush_keeps_live_set() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing_dir").join("places.fstore");
    let mut store = FeatureStore::open_path(&path).unwrap();

    let mut writer = store.writer().unwrap();
    writer.next().unwrap();
    writer.write().unwrap();
    let err = writer.close().unwrap_err();

    assert!(matches!(err, StoreError::Io(_)));
    assert!(store.last_synced().is_none());
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_failed_rename_leaves_no_tmp_file() {
    let (temp, path, mut store) = setup_empty_store();

    let mut writer = store.writer().unwrap();
    writer.next().unwrap();
    writer.write().unwrap();

    // A non-empty directory at the store path makes the final rename fail
    fs::create_dir(&path).unwrap();
    fs::write(path.join("occupied"), b"x").unwrap();

    let err = writer.close().unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
    assert!(!temp.path().join("places.fstore.tmp").exists());
    assert!(store.last_synced().is_none());
}
