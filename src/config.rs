//! Configuration for a feature store
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Main configuration for a FeatureStore instance
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// The single backing file. Read whole on reload, overwritten whole on
    /// writer close.
    pub path: PathBuf,

    // -------------------------------------------------------------------------
    // Schema Configuration
    // -------------------------------------------------------------------------
    /// Namespace attached to the derived record type
    pub namespace: Option<String>,

    /// Logical name of the derived record type (defaults to the file stem)
    pub type_name: Option<String>,

    /// Where the representative record for schema derivation comes from
    pub schema_source: SchemaSource,
}

/// Source of the representative record used to derive the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaSource {
    /// Always use the bundled template record
    #[default]
    Template,

    /// Use the first record of the backing file, falling back to the
    /// template when the file is missing or holds no records
    FirstRecord,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./features.fstore"),
            namespace: None,
            type_name: None,
            schema_source: SchemaSource::Template,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// The record type name exposed by the store
    ///
    /// Falls back to the backing file's stem.
    pub fn resolved_type_name(&self) -> Result<String> {
        if let Some(name) = &self.type_name {
            return Ok(name.clone());
        }

        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                StoreError::Config(format!(
                    "Cannot derive a type name from {}",
                    self.path.display()
                ))
            })
    }

    /// Validate the backing path against the codec's file extension
    ///
    /// The file itself may not exist yet, but if it does it must not be a
    /// directory.
    pub fn validate_path(&self, extension: &str) -> Result<()> {
        let matches_extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(extension));

        if !matches_extension {
            return Err(StoreError::InvalidPath(format!(
                "File does not carry the .{} extension: {}",
                extension,
                self.path.display()
            )));
        }

        if self.path.is_dir() {
            return Err(StoreError::InvalidPath(format!(
                "File is required (not a directory): {}",
                self.path.display()
            )));
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the backing file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the namespace of the derived record type
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = Some(namespace.into());
        self
    }

    /// Set the logical name of the derived record type
    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.config.type_name = Some(name.into());
        self
    }

    /// Set the schema source
    pub fn schema_source(mut self, source: SchemaSource) -> Self {
        self.config.schema_source = source;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
