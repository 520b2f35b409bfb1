//! Attribute values and their types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

use super::{Coord, Geometry};

/// Type of a record attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Bool,
    Int,
    Float,
    Text,
    Geometry,
}

impl AttributeType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeType::Bool => "bool",
            AttributeType::Int => "int",
            AttributeType::Float => "float",
            AttributeType::Text => "text",
            AttributeType::Geometry => "geometry",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Geometry(Geometry),
}

impl Value {
    /// The attribute type this value satisfies
    pub fn kind(&self) -> AttributeType {
        match self {
            Value::Bool(_) => AttributeType::Bool,
            Value::Int(_) => AttributeType::Int,
            Value::Float(_) => AttributeType::Float,
            Value::Text(_) => AttributeType::Text,
            Value::Geometry(_) => AttributeType::Geometry,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            Value::Geometry(g) => Some(g),
            _ => None,
        }
    }

    /// Whether the value can be stored in every document format
    ///
    /// NaN and infinities have no JSON representation.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Float(v) => v.is_finite(),
            Value::Geometry(g) => g.is_finite(),
            _ => true,
        }
    }

    /// Parse a value of the given type from its textual form
    ///
    /// Geometries are accepted as a point written `x,y`. Non-finite
    /// numbers are rejected.
    pub fn parse(kind: AttributeType, input: &str) -> Result<Self> {
        let invalid = || {
            StoreError::Config(format!("Cannot parse {:?} as {}", input, kind))
        };

        let value = match kind {
            AttributeType::Bool => Value::Bool(input.trim().parse().map_err(|_| invalid())?),
            AttributeType::Int => Value::Int(input.trim().parse().map_err(|_| invalid())?),
            AttributeType::Float => Value::Float(input.trim().parse().map_err(|_| invalid())?),
            AttributeType::Text => Value::Text(input.to_string()),
            AttributeType::Geometry => {
                let (x, y) = input.split_once(',').ok_or_else(invalid)?;
                let x = x.trim().parse().map_err(|_| invalid())?;
                let y = y.trim().parse().map_err(|_| invalid())?;
                Value::Geometry(Geometry::Point(Coord::new(x, y)))
            }
        };

        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Geometry(g) => write!(f, "{}", g),
        }
    }
}
