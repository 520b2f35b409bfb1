//! Error types for the feature store
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::feature::AttributeType;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for feature store operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Schema Errors
    // -------------------------------------------------------------------------
    #[error("Schema derivation failed: {0}")]
    SchemaDerivationFailed(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("No more records")]
    NoMoreRecords,

    #[error("Current record is not set")]
    NoCurrentRecord,

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Type mismatch for attribute {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: AttributeType,
        actual: AttributeType,
    },

    #[error("Invalid value for attribute {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    // -------------------------------------------------------------------------
    // Construction Errors
    // -------------------------------------------------------------------------
    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    #[error("Store file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Unknown authority code: {0}")]
    UnknownAuthorityCode(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
