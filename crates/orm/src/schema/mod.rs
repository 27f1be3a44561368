//! Normalized model schemas
//!
//! A [`Schema`] is the compiled form of a model's declared attributes:
//! attribute name mapped to a [`NormalizedAttribute`] with a canonical type
//! and the recognized modifiers. It is built once per collection and never
//! mutated afterward; CRUD operations use it to strip unknown keys from
//! values right before they cross the adapter boundary.

pub mod compiler;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record flowing through an operation: attribute name to value
pub type Record = serde_json::Map<String, Value>;

/// A query filter supplied to update/destroy/find
pub type Criteria = serde_json::Map<String, Value>;

/// Canonical attribute types
///
/// Any declared type outside this set degrades to `String` during
/// compilation rather than failing the compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Text,
    Integer,
    Float,
    Date,
    Time,
    Datetime,
    Boolean,
    Binary,
    Array,
    Json,
}

impl AttributeType {
    /// Normalize a declared type name: lowercase it and coerce anything
    /// outside the allowed set to `String`.
    pub fn from_declared(declared: &str) -> Self {
        match declared.to_lowercase().as_str() {
            "string" => AttributeType::String,
            "text" => AttributeType::Text,
            "integer" => AttributeType::Integer,
            "float" => AttributeType::Float,
            "date" => AttributeType::Date,
            "time" => AttributeType::Time,
            "datetime" => AttributeType::Datetime,
            "boolean" => AttributeType::Boolean,
            "binary" => AttributeType::Binary,
            "array" => AttributeType::Array,
            "json" => AttributeType::Json,
            _ => AttributeType::String,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::String => "string",
            AttributeType::Text => "text",
            AttributeType::Integer => "integer",
            AttributeType::Float => "float",
            AttributeType::Date => "date",
            AttributeType::Time => "time",
            AttributeType::Datetime => "datetime",
            AttributeType::Boolean => "boolean",
            AttributeType::Binary => "binary",
            AttributeType::Array => "array",
            AttributeType::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// One compiled attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAttribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults_to: Option<Value>,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
    pub index: bool,
}

impl NormalizedAttribute {
    pub(crate) fn of_type(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            defaults_to: None,
            primary_key: false,
            auto_increment: false,
            unique: false,
            index: false,
        }
    }
}

/// The compiled, immutable schema of one collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    attributes: BTreeMap<String, NormalizedAttribute>,
}

impl Schema {
    pub(crate) fn from_attributes(attributes: BTreeMap<String, NormalizedAttribute>) -> Self {
        Self { attributes }
    }

    pub fn get(&self, name: &str) -> Option<&NormalizedAttribute> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NormalizedAttribute)> {
        self.attributes.iter()
    }

    /// The attribute marked as primary key, if any
    pub fn primary_key(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(_, attr)| attr.primary_key)
            .map(|(name, _)| name.as_str())
    }

    /// Strip every key not present in the schema
    ///
    /// Applied immediately before an adapter call, never before hooks run,
    /// so hooks may stash transient keys on a record and have them removed
    /// before the values reach storage. Values of surviving keys pass
    /// through unchanged.
    pub fn clean_values(&self, values: Record) -> Record {
        values
            .into_iter()
            .filter(|(key, _)| self.attributes.contains_key(key))
            .collect()
    }
}
