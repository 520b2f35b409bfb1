//! Feature Module
//!
//! The record model shared by the codecs, the schema deriver and the store.
//!
//! ## Responsibilities
//! - Self-describing records (id, type name, typed attributes)
//! - Record types (schemas) extracted from records
//! - Envelope aggregation over geometry attributes
//!
//! The store never looks inside a record except to compute bounds and to
//! check that it conforms to the schema.

mod geometry;
mod record;
mod record_type;
mod value;

pub use geometry::{Coord, Envelope, Geometry};
pub use record::{Attribute, Record, RecordId};
pub use record_type::{AttributeDescriptor, RecordType};
pub use value::{AttributeType, Value};
