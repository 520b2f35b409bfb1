//! Store Module
//!
//! The caching and synchronization engine over one backing file.
//!
//! ## Responsibilities
//! - Keep the in-memory record set in step with the file (reload cache)
//! - Hand out snapshot readers and transactional writers
//! - Aggregate counts and bounds over the current record set
//!
//! ## Session Flow
//! ```text
//!   reader()/writer()
//!         │
//!         ▼
//!   ensure_fresh() ──(mtime changed)──▶ decode whole file
//!         │
//!         ▼
//!   snapshot copy ──▶ FeatureReader / FeatureWriter
//!                              │
//!                 write()/remove() hit the live set
//!                              │
//!                     close() ──▶ encode whole file, refresh mtime
//! ```

mod cache;
mod reader;
mod source;
mod writer;

use std::sync::Arc;

use crate::codec::RecordCodec;
use crate::error::Result;
use crate::feature::{Envelope, RecordType};

pub use cache::ReloadCache;
pub use reader::FeatureReader;
pub use source::FeatureStore;
pub use writer::{FeatureWriter, WriterState};

/// The narrow surface a record store exposes
pub trait FeatureSource {
    type Codec: RecordCodec;

    /// The derived record type, fixed for the store's lifetime
    fn schema(&self) -> Arc<RecordType>;

    /// Open a reader over a fresh snapshot
    fn reader(&mut self) -> Result<FeatureReader>;

    /// Open a write session
    fn writer(&mut self) -> Result<FeatureWriter<'_, Self::Codec>>;

    /// Envelope of every record's geometry
    fn bounds(&mut self) -> Result<Envelope>;

    /// Number of records
    fn count(&mut self) -> Result<usize>;
}
