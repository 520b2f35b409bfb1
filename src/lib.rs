//! # featurestore
//!
//! A single-file record store with:
//! - Records held in memory and lazily reloaded when the file changes
//! - Snapshot readers that restart on close
//! - Transactional writers that rewrite the file on close
//! - Record types derived from a representative template record
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       FeatureStore                           │
//! │            (FeatureSource: schema/reader/writer)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼────────────────────┐
//!          │            │                    │
//!          ▼            ▼                    ▼
//!   ┌─────────────┐ ┌─────────────┐   ┌─────────────┐
//!   │   Schema    │ │ ReloadCache │   │  Reader /   │
//!   │  Deriver    │ │  (mtime)    │◀──│   Writer    │
//!   └──────┬──────┘ └──────┬──────┘   └─────────────┘
//!          │               │
//!          ▼               ▼
//!   ┌─────────────────────────────┐
//!   │   RecordCodec (binary/json) │
//!   └──────────────┬──────────────┘
//!                  ▼
//!            backing file
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod feature;
pub mod codec;
pub mod schema;
pub mod store;
pub mod authority;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::{SchemaSource, StoreConfig};
pub use feature::{Record, RecordId, RecordType, Value};
pub use store::{FeatureReader, FeatureSource, FeatureStore, FeatureWriter};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of featurestore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
