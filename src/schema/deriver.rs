//! Schema Deriver
//!
//! Reads one representative record and turns its type into the store's
//! schema.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::codec::{JsonCodec, RecordCodec};
use crate::config::{SchemaSource, StoreConfig};
use crate::error::{Result, StoreError};
use crate::feature::{Record, RecordType};

use super::TEMPLATE;

/// Derives a store's record type from a representative record
#[derive(Debug, Clone)]
pub struct SchemaDeriver {
    /// Logical name given to the derived type
    type_name: String,

    /// Namespace given to the derived type
    namespace: Option<String>,

    /// Where the representative record comes from
    source: SchemaSource,
}

impl SchemaDeriver {
    pub fn new(
        type_name: impl Into<String>,
        namespace: Option<String>,
        source: SchemaSource,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            namespace,
            source,
        }
    }

    /// Deriver configured from a store config
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(
            config.resolved_type_name()?,
            config.namespace.clone(),
            config.schema_source,
        ))
    }

    /// Derive the record type
    ///
    /// Steps:
    /// 1. Decode the representative record (template or first file record)
    /// 2. Extract its record type
    /// 3. Rename it, keeping attributes and default geometry
    pub fn derive<C: RecordCodec>(&self, path: &Path, codec: &C) -> Result<RecordType> {
        let representative = match self.source {
            SchemaSource::Template => Self::template_record()?,
            SchemaSource::FirstRecord => match Self::first_record(path, codec)? {
                Some(record) => record,
                None => {
                    tracing::debug!(
                        "No record in {}, deriving schema from template",
                        path.display()
                    );
                    Self::template_record()?
                }
            },
        };

        let record_type = representative
            .record_type()
            .renamed(self.type_name.clone(), self.namespace.clone());

        tracing::debug!(
            "Derived schema {} with {} attributes (default geometry: {:?})",
            record_type.qualified_name(),
            record_type.attribute_count(),
            record_type.default_geometry
        );

        Ok(record_type)
    }

    /// Decode the bundled template record
    pub fn template_record() -> Result<Record> {
        JsonCodec
            .decode_first(&mut TEMPLATE.as_bytes())
            .map_err(|e| {
                StoreError::SchemaDerivationFailed(format!("Error processing template: {}", e))
            })?
            .ok_or_else(|| {
                StoreError::SchemaDerivationFailed("Template holds no record".to_string())
            })
    }

    /// First record of the backing file, `None` if the file is missing or empty
    fn first_record<C: RecordCodec>(path: &Path, codec: &C) -> Result<Option<Record>> {
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(path).map_err(|e| {
            StoreError::SchemaDerivationFailed(format!("Cannot open {}: {}", path.display(), e))
        })?;
        let mut reader = BufReader::new(file);

        codec.decode_first(&mut reader).map_err(|e| {
            StoreError::SchemaDerivationFailed(format!(
                "Error processing {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::AttributeType;

    #[test]
    fn test_template_decodes() {
        let record = SchemaDeriver::template_record().unwrap();
        assert_eq!(record.type_name(), "Placemark");
        assert!(record.attributes().iter().any(|a| a.kind == AttributeType::Geometry));
    }

    #[test]
    fn test_template_schema_is_renamed() {
        let deriver =
            SchemaDeriver::new("roads", Some("urn:test".to_string()), SchemaSource::Template);
        let schema = deriver
            .derive(Path::new("/nonexistent/roads.fstore"), &crate::codec::BinaryCodec)
            .unwrap();

        assert_eq!(schema.name, "roads");
        assert_eq!(schema.namespace.as_deref(), Some("urn:test"));
        assert_eq!(schema.default_geometry.as_deref(), Some("geometry"));
    }

    #[test]
    fn test_first_record_falls_back_to_template_when_missing() {
        let deriver = SchemaDeriver::new("roads", None, SchemaSource::FirstRecord);
        let schema = deriver
            .derive(Path::new("/nonexistent/roads.fstore"), &crate::codec::BinaryCodec)
            .unwrap();

        let template = SchemaDeriver::template_record().unwrap().record_type();
        assert_eq!(schema.attributes, template.attributes);
    }
}
