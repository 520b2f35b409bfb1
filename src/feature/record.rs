//! Records
//!
//! A record is self-describing: every attribute carries its name and type
//! alongside the (optional) value, so a record type can be read back from
//! any decoded record.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StoreError};

use super::{AttributeDescriptor, AttributeType, Envelope, RecordType, Value};

/// Unique record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One attribute slot of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeType,
    /// `None` means unset
    pub value: Option<Value>,
}

/// A structured data item with an identifier and typed attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    type_name: String,
    attributes: Vec<Attribute>,
}

impl Record {
    pub fn new(
        id: impl Into<RecordId>,
        type_name: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            attributes,
        }
    }

    /// A record of `record_type` with every attribute unset
    pub fn blank(record_type: &RecordType, id: RecordId) -> Self {
        let attributes = record_type
            .attributes
            .iter()
            .map(|slot| Attribute {
                name: slot.name.clone(),
                kind: slot.kind,
                value: None,
            })
            .collect();

        Self {
            id,
            type_name: record_type.name.clone(),
            attributes,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Replace the identifier, e.g. to give a synthesized record a chosen id
    pub fn set_id(&mut self, id: impl Into<RecordId>) {
        self.id = id.into();
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Value of the named attribute, `None` if unset or unknown
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_ref())
    }

    /// Set the named attribute
    ///
    /// The value must match the attribute's declared type and hold only
    /// finite numbers.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let attribute = self
            .attributes
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| StoreError::UnknownAttribute(name.to_string()))?;

        if value.kind() != attribute.kind {
            return Err(StoreError::TypeMismatch {
                name: name.to_string(),
                expected: attribute.kind,
                actual: value.kind(),
            });
        }
        if !value.is_finite() {
            return Err(StoreError::InvalidValue {
                name: name.to_string(),
                reason: "numbers must be finite".to_string(),
            });
        }

        attribute.value = Some(value);
        Ok(())
    }

    /// Clear the named attribute
    pub fn unset(&mut self, name: &str) -> Result<()> {
        let attribute = self
            .attributes
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| StoreError::UnknownAttribute(name.to_string()))?;
        attribute.value = None;
        Ok(())
    }

    /// The record type this record describes
    pub fn record_type(&self) -> RecordType {
        let slots = self
            .attributes
            .iter()
            .map(|a| AttributeDescriptor {
                name: a.name.clone(),
                kind: a.kind,
            })
            .collect();
        RecordType::new(self.type_name.clone(), slots)
    }

    /// Envelope covering every geometry attribute that is set
    pub fn bounds(&self) -> Envelope {
        let mut envelope = Envelope::empty();
        for geometry in self
            .attributes
            .iter()
            .filter_map(|a| a.value.as_ref())
            .filter_map(Value::as_geometry)
        {
            envelope.include(&geometry.envelope());
        }
        envelope
    }
}
