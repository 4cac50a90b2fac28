//! Wire-level schema documents for document collections.
//!
//! This module defines the canonical JSON representation a collection schema
//! travels in: a [`SchemaDocument`] with an ordered property map, a closed
//! `additionalProperties` policy, and an ordered `primary_key` sequence. The
//! types are designed for serialization with [`serde`]; property order is
//! preserved across round trips, and generated documents serialize with a
//! fixed top-level key order (`title`, `description`, `properties`,
//! `additionalProperties`, `primary_key`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Maximum depth for nested property trees and inheritance chains.
///
/// Walks that exceed this bound report an error instead of recursing
/// further.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Wire type tag carried in a property's `type` key.
///
/// Serialization always emits the canonical lower-case tag names. Parsing
/// additionally accepts the aliases other tooling commonly writes (`int`,
/// `long`, `integer`, `float`, `double`, `number`, `bool`), so documents
/// from mixed toolchains compare on meaning rather than spelling.
///
/// # Examples
///
/// ```
/// use collection_schema_core::TypeTag;
///
/// let tag: TypeTag = serde_json::from_str("\"double\"").unwrap();
/// assert_eq!(tag, TypeTag::Float64);
/// assert_eq!(serde_json::to_string(&tag).unwrap(), "\"float64\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// 32-bit signed integer.
    #[serde(alias = "int")]
    Int32,
    /// 64-bit signed integer.
    #[serde(alias = "long", alias = "integer")]
    Int64,
    /// 32-bit floating point.
    #[serde(alias = "float")]
    Float32,
    /// 64-bit floating point.
    #[serde(alias = "double", alias = "number")]
    Float64,
    /// UTF-8 string. Also the carrier for binary (`format: byte`) and
    /// enumerated properties.
    String,
    /// Boolean.
    #[serde(alias = "bool")]
    Boolean,
    /// Single raw byte.
    Byte,
    /// Homogeneous array; the element lives in `items`.
    Array,
    /// Embedded structured object.
    Object,
}

impl TypeTag {
    /// Returns the canonical wire spelling of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Int32 => "int32",
            TypeTag::Int64 => "int64",
            TypeTag::Float32 => "float32",
            TypeTag::Float64 => "float64",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Byte => "byte",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a property's `format` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyFormat {
    /// Marks a `string` property as raw binary data.
    Byte,
}

/// A single property of a [`SchemaDocument`].
///
/// Properties are wire-shaped: one struct covers primitives, binary data
/// (`string` + `format: byte`), arrays (`items`), embedded objects
/// (`title`/`properties`/`additionalProperties`), and enumerations
/// (`enum`). Unused facets are omitted from serialized output.
///
/// # Examples
///
/// ```
/// use collection_schema_core::{SchemaProperty, TypeTag};
///
/// let id = SchemaProperty::int64().auto_generated();
/// assert_eq!(id.kind, TypeTag::Int64);
/// assert!(id.auto_generate);
///
/// let tags = SchemaProperty::array(SchemaProperty::string());
/// assert_eq!(tags.kind, TypeTag::Array);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Wire type tag.
    #[serde(rename = "type")]
    pub kind: TypeTag,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Format qualifier (binary marker on `string` properties).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<PropertyFormat>,
    /// Array element property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaProperty>>,
    /// Closed value set for enumerated properties, in declaration order.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Embedded object title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Embedded object properties, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaProperty>>,
    /// Embedded object closed-schema policy.
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,
    /// Whether the database generates this value on insert. Only valid on
    /// primary-key members; emitted only when `true`.
    #[serde(rename = "autoGenerate", default, skip_serializing_if = "is_false")]
    pub auto_generate: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SchemaProperty {
    /// Creates a bare property with the given type tag.
    pub fn primitive(kind: TypeTag) -> Self {
        Self {
            kind,
            description: None,
            format: None,
            items: None,
            enum_values: None,
            title: None,
            properties: None,
            additional_properties: None,
            auto_generate: false,
        }
    }

    /// Creates a `string` property.
    pub fn string() -> Self {
        Self::primitive(TypeTag::String)
    }

    /// Creates an `int32` property.
    pub fn int32() -> Self {
        Self::primitive(TypeTag::Int32)
    }

    /// Creates an `int64` property.
    pub fn int64() -> Self {
        Self::primitive(TypeTag::Int64)
    }

    /// Creates a `float64` property.
    pub fn float64() -> Self {
        Self::primitive(TypeTag::Float64)
    }

    /// Creates a `boolean` property.
    pub fn boolean() -> Self {
        Self::primitive(TypeTag::Boolean)
    }

    /// Creates a binary property (`string` with `format: byte`).
    pub fn binary() -> Self {
        let mut prop = Self::primitive(TypeTag::String);
        prop.format = Some(PropertyFormat::Byte);
        prop
    }

    /// Creates an array property with the given element.
    pub fn array(items: SchemaProperty) -> Self {
        let mut prop = Self::primitive(TypeTag::Array);
        prop.items = Some(Box::new(items));
        prop
    }

    /// Creates an embedded object property.
    pub fn object(title: &str, properties: IndexMap<String, SchemaProperty>) -> Self {
        let mut prop = Self::primitive(TypeTag::Object);
        prop.title = Some(title.to_string());
        prop.properties = Some(properties);
        prop.additional_properties = Some(false);
        prop
    }

    /// Creates an enumerated property (`string` with a closed value set).
    pub fn enumeration(values: Vec<String>) -> Self {
        let mut prop = Self::primitive(TypeTag::String);
        prop.enum_values = Some(values);
        prop
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Marks the value as database-generated.
    pub fn auto_generated(mut self) -> Self {
        self.auto_generate = true;
        self
    }

    /// Whether this is the binary form (`string` + `format: byte`).
    pub fn is_binary(&self) -> bool {
        self.kind == TypeTag::String && self.format == Some(PropertyFormat::Byte)
    }
}

/// Canonical wire schema for one document collection.
///
/// This is the primary type in the crate. Property order is document order:
/// it survives serialization and deserialization, and every derived view
/// (synthesized fields, constructor parameters) follows it. Generated
/// documents always carry `additionalProperties: false`.
///
/// # Examples
///
/// ```
/// use collection_schema_core::{SchemaDocument, SchemaProperty};
///
/// let doc = SchemaDocument::new("users")
///     .with_property("id", SchemaProperty::int64().auto_generated())
///     .with_property("name", SchemaProperty::string())
///     .with_primary_key(["id"]);
///
/// assert_eq!(doc.property_names(), vec!["id", "name"]);
/// assert!(doc.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Collection name.
    pub title: String,
    /// Human-readable description; omitted from output when empty.
    #[serde(default, skip_serializing_if = "description_is_empty")]
    pub description: Option<String>,
    /// Properties in document order.
    pub properties: IndexMap<String, SchemaProperty>,
    /// Closed-schema policy; always `false` on generated documents.
    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: bool,
    /// Ordered primary-key field names.
    #[serde(default)]
    pub primary_key: Vec<String>,
}

fn description_is_empty(description: &Option<String>) -> bool {
    description.as_deref().map_or(true, str::is_empty)
}

impl SchemaDocument {
    /// Creates an empty document with the given title.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Appends a property, preserving insertion order.
    pub fn with_property(mut self, name: &str, property: SchemaProperty) -> Self {
        self.properties.insert(name.to_string(), property);
        self
    }

    /// Sets the ordered primary-key sequence.
    pub fn with_primary_key<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = names.into_iter().map(Into::into).collect();
        self
    }

    /// Property names in document order.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    /// Looks up a property by name.
    pub fn get(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.get(name)
    }

    /// Whether the named property is a primary-key member.
    pub fn is_key_member(&self, name: &str) -> bool {
        self.primary_key.iter().any(|key| key == name)
    }

    /// Serializes to pretty-printed JSON with the canonical key order.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serializes to compact JSON with the canonical key order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a document from JSON.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Validates the structural integrity of a standalone document.
    ///
    /// Checks the title, primary-key membership, auto-generate placement,
    /// and per-property facet coherence (arrays carry `items`, objects
    /// carry `properties`, enumerations are non-empty). The first
    /// violation is returned. Documents that inherit key fields from an
    /// ancestor schema fail the membership check here; they are resolved
    /// through a registry during synthesis instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use collection_schema_core::{SchemaDocument, SchemaProperty};
    ///
    /// let doc = SchemaDocument::new("users")
    ///     .with_property("name", SchemaProperty::string())
    ///     .with_primary_key(["id"]);
    ///
    /// // Primary key names a property that does not exist.
    /// assert!(doc.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(SchemaError::InvalidSchema(
                "document title cannot be empty".to_string(),
            ));
        }

        for key in &self.primary_key {
            if !self.properties.contains_key(key) {
                return Err(SchemaError::InvalidSchema(format!(
                    "primary key field '{key}' is not declared in properties"
                )));
            }
        }

        for (name, property) in &self.properties {
            if name.trim().is_empty() {
                return Err(SchemaError::InvalidSchema(
                    "property name cannot be empty".to_string(),
                ));
            }
            validate_property(name, property, self.is_key_member(name), 0)?;
        }

        Ok(())
    }
}

fn validate_property(
    name: &str,
    property: &SchemaProperty,
    key_member: bool,
    depth: usize,
) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(SchemaError::InvalidSchema(format!(
            "property '{name}' exceeds the maximum nesting depth of {MAX_NESTING_DEPTH}"
        )));
    }

    if property.auto_generate && !key_member {
        return Err(SchemaError::InvalidSchema(format!(
            "autoGenerate is only valid on primary-key fields, found on '{name}'"
        )));
    }

    if property.format.is_some() && property.kind != TypeTag::String {
        return Err(SchemaError::InvalidSchema(format!(
            "property '{name}' carries a format qualifier but is not a string"
        )));
    }

    if let Some(values) = &property.enum_values {
        if property.kind != TypeTag::String {
            return Err(SchemaError::InvalidSchema(format!(
                "enumerated property '{name}' must have type string"
            )));
        }
        if values.is_empty() {
            return Err(SchemaError::InvalidSchema(format!(
                "enumerated property '{name}' has no values"
            )));
        }
    }

    match property.kind {
        TypeTag::Array => {
            let Some(items) = &property.items else {
                return Err(SchemaError::InvalidSchema(format!(
                    "array property '{name}' is missing items"
                )));
            };
            validate_property(name, items, false, depth + 1)
        }
        TypeTag::Object => {
            let Some(properties) = &property.properties else {
                return Err(SchemaError::InvalidSchema(format!(
                    "object property '{name}' is missing properties"
                )));
            };
            for (nested_name, nested) in properties {
                if nested_name.trim().is_empty() {
                    return Err(SchemaError::InvalidSchema(format!(
                        "object property '{name}' contains an empty field name"
                    )));
                }
                validate_property(nested_name, nested, false, depth + 1)?;
            }
            Ok(())
        }
        _ => {
            if property.items.is_some() {
                return Err(SchemaError::InvalidSchema(format!(
                    "property '{name}' carries items but is not an array"
                )));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_document() -> SchemaDocument {
        SchemaDocument::new("users")
            .with_description("Registered users")
            .with_property("id", SchemaProperty::int64().auto_generated())
            .with_property("name", SchemaProperty::string())
            .with_property("balance", SchemaProperty::float64())
            .with_primary_key(["id"])
    }

    #[test]
    fn test_property_order_survives_round_trip() {
        let doc = user_document();
        let json = doc.to_json_pretty().unwrap();
        let parsed = SchemaDocument::from_json(&json).unwrap();

        assert_eq!(parsed.property_names(), vec!["id", "name", "balance"]);
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_top_level_key_order() {
        let doc = user_document();
        let json = doc.to_json().unwrap();

        let title = json.find("\"title\"").unwrap();
        let description = json.find("\"description\"").unwrap();
        let properties = json.find("\"properties\"").unwrap();
        let additional = json.find("\"additionalProperties\"").unwrap();
        let primary_key = json.find("\"primary_key\"").unwrap();
        assert!(title < description);
        assert!(description < properties);
        assert!(properties < additional);
        assert!(additional < primary_key);
    }

    #[test]
    fn test_empty_description_is_omitted() {
        let mut doc = user_document();
        doc.description = Some(String::new());
        let json = doc.to_json().unwrap();
        assert!(!json.contains("\"description\""));

        doc.description = None;
        let json = doc.to_json().unwrap();
        assert!(!json.contains("\"description\""));
    }

    #[test]
    fn test_auto_generate_serialized_only_when_true() {
        let doc = user_document();
        let json = doc.to_json().unwrap();
        assert_eq!(json.matches("\"autoGenerate\":true").count(), 1);
    }

    #[test]
    fn test_type_tag_aliases_parse_to_canonical_kinds() {
        let doc: SchemaDocument = serde_json::from_str(
            r#"{
                "title": "accounts",
                "properties": {
                    "id": {"type": "int"},
                    "balance": {"type": "double"},
                    "active": {"type": "bool"}
                },
                "additionalProperties": false,
                "primary_key": ["id"]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.get("id").unwrap().kind, TypeTag::Int32);
        assert_eq!(doc.get("balance").unwrap().kind, TypeTag::Float64);
        assert_eq!(doc.get("active").unwrap().kind, TypeTag::Boolean);
    }

    #[test]
    fn test_validate_rejects_missing_key_property() {
        let doc = SchemaDocument::new("users")
            .with_property("name", SchemaProperty::string())
            .with_primary_key(["id"]);

        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("primary key field 'id'"));
    }

    #[test]
    fn test_validate_rejects_auto_generate_on_non_key_field() {
        let doc = SchemaDocument::new("users")
            .with_property("id", SchemaProperty::int64())
            .with_property("name", SchemaProperty::string().auto_generated())
            .with_primary_key(["id"]);

        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("autoGenerate"));
    }

    #[test]
    fn test_validate_rejects_array_without_items() {
        let mut doc = SchemaDocument::new("users");
        doc.properties
            .insert("tags".to_string(), SchemaProperty::primitive(TypeTag::Array));

        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("missing items"));
    }

    #[test]
    fn test_validate_accepts_nested_object() {
        let mut address_fields = IndexMap::new();
        address_fields.insert("street".to_string(), SchemaProperty::string());
        address_fields.insert("zip".to_string(), SchemaProperty::string());

        let doc = SchemaDocument::new("users")
            .with_property("id", SchemaProperty::int64())
            .with_property("address", SchemaProperty::object("address", address_fields))
            .with_primary_key(["id"]);

        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_binary_property_shape() {
        let prop = SchemaProperty::binary();
        assert!(prop.is_binary());

        let json = serde_json::to_string(&prop).unwrap();
        assert_eq!(json, r#"{"type":"string","format":"byte"}"#);
    }
}
