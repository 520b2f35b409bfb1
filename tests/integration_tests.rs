//! End-to-end tests for featurestore
//!
//! Full sessions against a real backing file: open, read, mutate, close,
//! reopen.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use featurestore::codec::{BinaryCodec, RecordCodec};
use featurestore::schema::SchemaDeriver;
use featurestore::{FeatureStore, Record, RecordId, Value};
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

fn summary(records: &[Record]) -> Vec<(String, Option<String>)> {
    records
        .iter()
        .map(|r| {
            (
                r.id().to_string(),
                r.get("name").and_then(Value::as_text).map(str::to_string),
            )
        })
        .collect()
}

fn read_file(path: &Path) -> Vec<Record> {
    let file = File::open(path).unwrap();
    BinaryCodec.decode_all(&mut BufReader::new(file)).unwrap()
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_remove_and_append_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("places.fstore");
    {
        let file = File::create(&path).unwrap();
        BinaryCodec
            .encode_all(&[placemark("a", "X"), placemark("b", "Y")], &mut BufWriter::new(file))
            .unwrap();
    }

    let mut store = FeatureStore::open_path(&path).unwrap();

    let mut writer = store.writer().unwrap();
    while writer.has_next() {
        if writer.next().unwrap().id().as_str() == "a" {
            writer.remove().unwrap();
        }
    }
    let record = writer.next().unwrap();
    record.set_id("c");
    record.set("name", Value::Text("Z".to_string())).unwrap();
    writer.write().unwrap();
    writer.close().unwrap();

    let expected = vec![
        ("b".to_string(), Some("Y".to_string())),
        ("c".to_string(), Some("Z".to_string())),
    ];

    let from_reader = store.reader().unwrap().collect_remaining();
    assert_eq!(summary(&from_reader), expected);

    let from_disk = read_file(&path);
    assert_eq!(summary(&from_disk), expected);
    assert_eq!(from_disk, from_reader);

    // A brand new store over the same file sees the same records
    let mut reopened = FeatureStore::open_path(&path).unwrap();
    assert_eq!(summary(&reopened.reader().unwrap().collect_remaining()), expected);
}

#[test]
fn test_first_writer_close_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("new.fstore");
    let mut store = FeatureStore::open_path(&path).unwrap();

    let writer = store.writer().unwrap();
    writer.close().unwrap();

    assert!(path.exists());
    assert!(read_file(&path).is_empty());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_two_stores_over_one_file_see_each_others_writes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shared.fstore");

    let mut first = FeatureStore::open_path(&path).unwrap();
    let mut second = FeatureStore::open_path(&path).unwrap();

    let mut writer = first.writer().unwrap();
    writer
        .next()
        .unwrap()
        .set("name", Value::Text("from first".to_string()))
        .unwrap();
    writer.write().unwrap();
    writer.close().unwrap();

    let records = second.reader().unwrap().collect_remaining();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name"), Some(&Value::Text("from first".to_string())));
}
