//! Transactional Writer
//!
//! Steps through a snapshot of the record set, applies remove/write calls
//! to the store's live set as they happen, and rewrites the backing file
//! on close.
//!
//! ## State Machine
//! ```text
//!   Committed ── next(), snapshot left ──────▶ Scanning { existing record }
//!   Committed ── next(), snapshot exhausted ─▶ Synthesized(blank record)
//!   Scanning | Synthesized ── write() / remove() ──▶ Committed
//!   Scanning | Synthesized ── next() ──▶ Scanning | Synthesized
//! ```
//! `close()` flushes the live set from any state and ends the session.

use std::sync::Arc;

use crate::codec::RecordCodec;
use crate::error::{Result, StoreError};
use crate::feature::{Record, RecordId, RecordType};

use super::ReloadCache;

/// Where the writer's cursor stands
#[derive(Debug, Clone, PartialEq)]
pub enum WriterState {
    /// No current record: nothing yielded yet, or the last one was
    /// written or removed
    Committed,

    /// Current record is an existing record from the snapshot
    ///
    /// `original_id` is the id it had when yielded; `write()` and `remove()`
    /// target the stored record by that id even if the caller changed it.
    Scanning { record: Record, original_id: RecordId },

    /// Current record is a freshly synthesized blank record
    Synthesized(Record),
}

impl WriterState {
    fn current(&self) -> Option<&Record> {
        match self {
            WriterState::Committed => None,
            WriterState::Scanning { record, .. } | WriterState::Synthesized(record) => Some(record),
        }
    }

    fn current_mut(&mut self) -> Option<&mut Record> {
        match self {
            WriterState::Committed => None,
            WriterState::Scanning { record, .. } | WriterState::Synthesized(record) => Some(record),
        }
    }
}

/// Iterator plus mutation handle over one write session
///
/// Holds the store's cache mutably for its whole lifetime, so only one
/// session can be open against a store at a time.
pub struct FeatureWriter<'a, C: RecordCodec> {
    cache: &'a mut ReloadCache,
    codec: &'a C,
    schema: Arc<RecordType>,
    snapshot: std::vec::IntoIter<Record>,
    state: WriterState,
    closed: bool,
}

impl<'a, C: RecordCodec> FeatureWriter<'a, C> {
    pub(crate) fn new(cache: &'a mut ReloadCache, codec: &'a C, schema: Arc<RecordType>) -> Self {
        let snapshot = cache.snapshot().into_iter();
        Self {
            cache,
            codec,
            schema,
            snapshot,
            state: WriterState::Committed,
            closed: false,
        }
    }

    pub fn schema(&self) -> &RecordType {
        &self.schema
    }

    pub fn state(&self) -> &WriterState {
        &self.state
    }

    /// Whether the snapshot has existing records left
    ///
    /// `next()` still succeeds when this is false; it synthesizes a new record.
    pub fn has_next(&self) -> bool {
        self.snapshot.len() > 0
    }

    /// Advance to the next existing record, or synthesize a blank one
    ///
    /// A blank record has a fresh id and every attribute unset; fill it
    /// through the returned reference and call `write()` to append it.
    /// A current record that was neither written nor removed is dropped.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<&mut Record> {
        if let Some(pending) = self.state.current() {
            tracing::trace!("Discarding untouched current record {}", pending.id());
        }

        self.state = match self.snapshot.next() {
            Some(record) => WriterState::Scanning {
                original_id: record.id().clone(),
                record,
            },
            None => {
                let blank = Record::blank(&self.schema, RecordId::generate());
                tracing::trace!("Synthesized blank record {}", blank.id());
                WriterState::Synthesized(blank)
            }
        };

        self.current_mut()
    }

    /// The current record, if any
    pub fn current(&self) -> Option<&Record> {
        self.state.current()
    }

    /// Mutable access to the current record
    pub fn current_mut(&mut self) -> Result<&mut Record> {
        self.state.current_mut().ok_or(StoreError::NoCurrentRecord)
    }

    /// Delete the current record from the store
    ///
    /// An existing record is removed by the id it was read with.
    pub fn remove(&mut self) -> Result<()> {
        let id = match self.take_current()? {
            WriterState::Scanning { original_id, .. } => original_id,
            WriterState::Synthesized(record) => record.id().clone(),
            WriterState::Committed => return Err(StoreError::NoCurrentRecord),
        };
        let removed = self.cache.remove(&id);
        tracing::trace!("Removed record {} (present: {})", id, removed);
        Ok(())
    }

    /// Add the current record to the store
    ///
    /// An existing record replaces the one it was read from, in place. A
    /// synthesized record whose id is already present replaces that record.
    pub fn write(&mut self) -> Result<()> {
        match self.take_current()? {
            WriterState::Scanning {
                record,
                original_id,
            } => {
                tracing::trace!("Rewrote record {} as {}", original_id, record.id());
                self.cache.replace(&original_id, record);
            }
            WriterState::Synthesized(record) => {
                tracing::trace!("Wrote record {}", record.id());
                self.cache.add(record);
            }
            WriterState::Committed => return Err(StoreError::NoCurrentRecord),
        }
        Ok(())
    }

    /// End the session and rewrite the backing file from the live set
    ///
    /// Changes already applied by `write()`/`remove()` stay in memory even
    /// if the flush fails.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.cache.flush(self.codec)
    }

    /// Move the current state out, leaving `Committed`
    fn take_current(&mut self) -> Result<WriterState> {
        match std::mem::replace(&mut self.state, WriterState::Committed) {
            WriterState::Committed => Err(StoreError::NoCurrentRecord),
            state => Ok(state),
        }
    }
}

impl<C: RecordCodec> Drop for FeatureWriter<'_, C> {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!(
                "Writer for {} dropped without close, backing file not rewritten",
                self.cache.path().display()
            );
        }
    }
}
