//! Feature Store
//!
//! Ties the schema, the reload cache and the codec together behind the
//! `FeatureSource` interface.

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use crate::codec::{BinaryCodec, RecordCodec};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::feature::{Envelope, RecordType};
use crate::schema::SchemaDeriver;

use super::{FeatureReader, FeatureSource, FeatureWriter, ReloadCache};

/// A record store backed by a single file
///
/// ## Session Model
/// Readers own their snapshot and leave the store free. Writers borrow the
/// store mutably until closed, so a store never has two write sessions
/// (or a reload racing a write session) at once.
///
/// ## Missing Files
/// A backing file that does not exist is treated as an empty store. It is
/// created by the first writer close.
pub struct FeatureStore<C: RecordCodec = BinaryCodec> {
    /// Store configuration
    config: StoreConfig,

    /// Document codec for the backing file
    codec: C,

    /// Derived once at construction
    schema: Arc<RecordType>,

    /// Live record set and sync timestamp
    cache: ReloadCache,
}

impl<C: RecordCodec> FeatureStore<C> {
    /// Open a store over the configured file
    ///
    /// On open:
    /// 1. Validate the path (extension, not a directory)
    /// 2. Derive the schema (fatal on failure)
    ///
    /// The file itself is not read until the first session.
    pub fn open(config: StoreConfig, codec: C) -> Result<Self> {
        // Step 1: Validate the backing path
        config.validate_path(codec.extension())?;

        // Step 2: Derive the schema
        let schema = SchemaDeriver::from_config(&config)?.derive(&config.path, &codec)?;

        tracing::debug!(
            "Opened store {} over {}",
            schema.qualified_name(),
            config.path.display()
        );

        Ok(Self {
            cache: ReloadCache::new(config.path.clone()),
            config,
            codec,
            schema: Arc::new(schema),
        })
    }

    /// Open a store over a file that must not exist yet
    pub fn create_new(config: StoreConfig, codec: C) -> Result<Self> {
        if config.path.exists() {
            return Err(StoreError::AlreadyExists(config.path.clone()));
        }
        Self::open(config, codec)
    }

    /// The derived record type
    pub fn schema(&self) -> Arc<RecordType> {
        Arc::clone(&self.schema)
    }

    /// Bring the live set in line with the backing file
    pub fn ensure_fresh(&mut self) -> Result<()> {
        self.cache.ensure_fresh(&self.codec, &self.schema)
    }

    /// Open a reader over a snapshot of the current record set
    pub fn reader(&mut self) -> Result<FeatureReader> {
        self.ensure_fresh()?;
        Ok(FeatureReader::new(self.cache.snapshot(), self.schema()))
    }

    /// Open a write session
    pub fn writer(&mut self) -> Result<FeatureWriter<'_, C>> {
        self.ensure_fresh()?;
        let schema = self.schema();
        Ok(FeatureWriter::new(&mut self.cache, &self.codec, schema))
    }

    /// Envelope of every record's geometry attributes
    pub fn bounds(&mut self) -> Result<Envelope> {
        let mut bounds = Envelope::empty();
        let mut reader = self.reader()?;
        while reader.has_next() {
            bounds.include(&reader.next()?.bounds());
        }
        reader.close();
        Ok(bounds)
    }

    /// Number of records in the live set
    pub fn count(&mut self) -> Result<usize> {
        self.ensure_fresh()?;
        Ok(self.cache.len())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the codec
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Number of full decode passes performed so far
    pub fn reload_count(&self) -> u64 {
        self.cache.reload_count()
    }

    /// Modification time of the file when the live set last matched it
    pub fn last_synced(&self) -> Option<SystemTime> {
        self.cache.last_synced()
    }
}

impl FeatureStore<BinaryCodec> {
    /// Open with a path (convenience method)
    ///
    /// Uses the binary codec and default config for the given file.
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = StoreConfig::builder().path(path).build();
        Self::open(config, BinaryCodec)
    }
}

impl<C: RecordCodec> FeatureSource for FeatureStore<C> {
    type Codec = C;

    fn schema(&self) -> Arc<RecordType> {
        FeatureStore::schema(self)
    }

    fn reader(&mut self) -> Result<FeatureReader> {
        FeatureStore::reader(self)
    }

    fn writer(&mut self) -> Result<FeatureWriter<'_, C>> {
        FeatureStore::writer(self)
    }

    fn bounds(&mut self) -> Result<Envelope> {
        FeatureStore::bounds(self)
    }

    fn count(&mut self) -> Result<usize> {
        FeatureStore::count(self)
    }
}
