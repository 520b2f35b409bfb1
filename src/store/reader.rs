//! Sequential Reader
//!
//! Single-pass iteration over a snapshot taken when the reader opens.

use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::feature::{Record, RecordType};

/// Read-only cursor over a private copy of the record set
///
/// Later changes to the store do not affect an open reader. `close()`
/// rewinds instead of invalidating, so a closed reader silently restarts
/// from the first record.
#[derive(Debug)]
pub struct FeatureReader {
    schema: Arc<RecordType>,
    snapshot: Vec<Record>,
    position: usize,
}

impl FeatureReader {
    /// Open a reader over `snapshot`
    pub fn new(snapshot: Vec<Record>, schema: Arc<RecordType>) -> Self {
        Self {
            schema,
            snapshot,
            position: 0,
        }
    }

    pub fn schema(&self) -> &RecordType {
        &self.schema
    }

    pub fn has_next(&self) -> bool {
        self.position < self.snapshot.len()
    }

    /// The next record in insertion order
    ///
    /// Fails with `NoMoreRecords` once `has_next()` is false.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Record> {
        let record = self
            .snapshot
            .get(self.position)
            .cloned()
            .ok_or(StoreError::NoMoreRecords)?;
        self.position += 1;
        Ok(record)
    }

    /// Rewind to the start of the snapshot
    pub fn close(&mut self) {
        self.position = 0;
    }

    /// Number of records in the snapshot
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Drain the remaining records
    pub fn collect_remaining(&mut self) -> Vec<Record> {
        let rest = self.snapshot[self.position..].to_vec();
        self.position = self.snapshot.len();
        rest
    }
}
