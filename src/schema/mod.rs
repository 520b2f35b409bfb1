//! Schema Module
//!
//! Derives the record type a store exposes from one representative record
//! instead of from a declared schema.
//!
//! ## Sources
//! - The bundled template (`template.jsonl`), a single placemark record
//! - The first record of the backing file
//!
//! Whichever record is used, its type is renamed to the store's logical
//! name and namespace while the attribute structure and the default
//! geometry attribute are kept as-is.

mod deriver;

pub use deriver::SchemaDeriver;

/// The bundled representative record, as a JSON-lines document
pub const TEMPLATE: &str = include_str!("template.jsonl");
