//! Storage-type to schema mapping.
//!
//! Data-model libraries describe each attribute with an abstract storage tag such as
//! `INTEGER` or `DATEONLY`. This module turns those tags into Swagger `type`/`format`
//! pairs and builds the object schema for a whole attribute map.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Default `type` of a generated object schema.
pub const OBJECT_TYPE: &str = "object";

/// Abstract storage kinds understood by the mapper.
///
/// Tags are matched exactly as the model layer emits them (upper case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    String,
    Char,
    Text,
    Blob,
    Date,
    DateOnly,
    Time,
    Now,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    Boolean,
    Array,
}

impl StorageType {
    /// Every recognized storage type.
    pub const ALL: [StorageType; 15] = [
        StorageType::String,
        StorageType::Char,
        StorageType::Text,
        StorageType::Blob,
        StorageType::Date,
        StorageType::DateOnly,
        StorageType::Time,
        StorageType::Now,
        StorageType::Integer,
        StorageType::BigInt,
        StorageType::Float,
        StorageType::Double,
        StorageType::Decimal,
        StorageType::Boolean,
        StorageType::Array,
    ];

    /// Look up a storage tag, returning `None` for anything unrecognized.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let storage_type = match tag {
            "STRING" => StorageType::String,
            "CHAR" => StorageType::Char,
            "TEXT" => StorageType::Text,
            "BLOB" => StorageType::Blob,
            "DATE" => StorageType::Date,
            "DATEONLY" => StorageType::DateOnly,
            "TIME" => StorageType::Time,
            "NOW" => StorageType::Now,
            "INTEGER" => StorageType::Integer,
            "BIGINT" => StorageType::BigInt,
            "FLOAT" => StorageType::Float,
            "DOUBLE" => StorageType::Double,
            "DECIMAL" => StorageType::Decimal,
            "BOOLEAN" => StorageType::Boolean,
            "ARRAY" => StorageType::Array,
            _ => return None,
        };
        Some(storage_type)
    }

    /// The tag this storage type is spelled with.
    pub fn tag(self) -> &'static str {
        match self {
            StorageType::String => "STRING",
            StorageType::Char => "CHAR",
            StorageType::Text => "TEXT",
            StorageType::Blob => "BLOB",
            StorageType::Date => "DATE",
            StorageType::DateOnly => "DATEONLY",
            StorageType::Time => "TIME",
            StorageType::Now => "NOW",
            StorageType::Integer => "INTEGER",
            StorageType::BigInt => "BIGINT",
            StorageType::Float => "FLOAT",
            StorageType::Double => "DOUBLE",
            StorageType::Decimal => "DECIMAL",
            StorageType::Boolean => "BOOLEAN",
            StorageType::Array => "ARRAY",
        }
    }

    /// Swagger `type` for this storage type.
    pub fn schema_type(self) -> &'static str {
        match self {
            StorageType::String
            | StorageType::Char
            | StorageType::Text
            | StorageType::Blob
            | StorageType::Date
            | StorageType::DateOnly
            | StorageType::Time
            | StorageType::Now => "string",
            StorageType::Integer | StorageType::BigInt => "integer",
            StorageType::Float | StorageType::Double | StorageType::Decimal => "number",
            StorageType::Boolean => "boolean",
            StorageType::Array => "array",
        }
    }

    /// Swagger `format` for this storage type, empty when there is none.
    pub fn schema_format(self) -> &'static str {
        match self {
            StorageType::Integer | StorageType::Decimal => "int32",
            StorageType::BigInt => "int64",
            StorageType::Float => "float",
            StorageType::Double => "double",
            StorageType::Date | StorageType::DateOnly => "date",
            StorageType::Time | StorageType::Now => "date-time",
            _ => "",
        }
    }
}

/// Map a storage tag to a `(type, format)` pair.
///
/// Unrecognized tags map to empty strings for both halves rather than failing.
pub fn map_storage_type(tag: &str) -> (&'static str, &'static str) {
    match StorageType::from_tag(tag) {
        Some(storage_type) => (storage_type.schema_type(), storage_type.schema_format()),
        None => {
            debug!("Unrecognized storage tag: {}", tag);
            ("", "")
        }
    }
}

/// Property definition for object schemas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// The type of the property
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Format for primitive types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Items schema for array properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
    /// Any other keys the author wrote (description, `$ref`, enum, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Property {
    /// Build a property from a storage tag.
    ///
    /// `items` is attached only when the tag is `ARRAY`.
    pub fn from_storage_tag(tag: &str, items: Option<Value>) -> Self {
        let (property_type, format) = map_storage_type(tag);
        let items = match StorageType::from_tag(tag) {
            Some(StorageType::Array) => items,
            _ => None,
        };

        Property {
            property_type: Some(property_type.to_string()),
            format: Some(format.to_string()),
            items,
            extra: Map::new(),
        }
    }
}

/// Object schema produced from a data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, Property>,
}

/// Build an object schema from an attribute-name to storage-tag map.
///
/// Properties in `overrides` replace generated ones key by key. `items` supplies the
/// `items` fragment for array attributes, keyed by attribute name.
pub fn build_schema(
    attributes: Option<&BTreeMap<String, String>>,
    overrides: &BTreeMap<String, Property>,
    object_type: Option<&str>,
    items: &BTreeMap<String, Value>,
) -> Schema {
    let mut properties = BTreeMap::new();

    if let Some(attributes) = attributes {
        for (name, tag) in attributes {
            let property = Property::from_storage_tag(tag, items.get(name).cloned());
            properties.insert(name.clone(), property);
        }
    }

    for (name, property) in overrides {
        properties.insert(name.clone(), property.clone());
    }

    debug!("Built schema with {} properties", properties.len());

    Schema {
        schema_type: object_type.unwrap_or(OBJECT_TYPE).to_string(),
        properties,
    }
}

/// The minimal shape of a data model consumed by the schema builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Attribute name to storage tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
    /// `items` fragments for array attributes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub items: BTreeMap<String, Value>,
    /// Properties replacing the generated ones
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Property>,
    /// Schema type, `object` when absent
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
}

impl ModelDescriptor {
    pub fn new(attributes: BTreeMap<String, String>) -> Self {
        Self {
            attributes: Some(attributes),
            ..Self::default()
        }
    }

    pub fn to_schema(&self) -> Schema {
        build_schema(
            self.attributes.as_ref(),
            &self.properties,
            self.object_type.as_deref(),
            &self.items,
        )
    }

    /// Attributes whose tag the mapper does not recognize, as `(name, tag)` pairs.
    pub fn unknown_attributes(&self) -> Vec<(&str, &str)> {
        self.attributes
            .iter()
            .flatten()
            .filter(|(_, tag)| StorageType::from_tag(tag).is_none())
            .map(|(name, tag)| (name.as_str(), tag.as_str()))
            .collect()
    }
}
