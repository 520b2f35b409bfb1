//! Record types (schemas)

use serde::{Deserialize, Serialize};

use super::{AttributeType, Record};

/// Name and type of one attribute slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub kind: AttributeType,
}

/// The attribute structure every record of a store conforms to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    /// Logical type name
    pub name: String,

    /// Optional namespace URI
    pub namespace: Option<String>,

    /// Ordered attribute slots
    pub attributes: Vec<AttributeDescriptor>,

    /// Name of the default geometry attribute, if any
    pub default_geometry: Option<String>,
}

impl RecordType {
    /// Build a type from its attribute slots
    ///
    /// The first geometry attribute becomes the default geometry.
    pub fn new(name: impl Into<String>, attributes: Vec<AttributeDescriptor>) -> Self {
        let default_geometry = attributes
            .iter()
            .find(|a| a.kind == AttributeType::Geometry)
            .map(|a| a.name.clone());

        Self {
            name: name.into(),
            namespace: None,
            attributes,
            default_geometry,
        }
    }

    /// Same structure and default geometry under a new name and namespace
    pub fn renamed(&self, name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
            attributes: self.attributes.clone(),
            default_geometry: self.default_geometry.clone(),
        }
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Whether `record` has exactly this type's attribute names and kinds, in order
    ///
    /// The record's own type name is not compared.
    pub fn accepts(&self, record: &Record) -> bool {
        self.attributes.len() == record.attributes().len()
            && self
                .attributes
                .iter()
                .zip(record.attributes())
                .all(|(slot, attr)| slot.name == attr.name && slot.kind == attr.kind)
    }

    /// Qualified name: `{namespace}name`, or just `name`
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}
