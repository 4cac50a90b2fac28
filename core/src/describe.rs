//! Host-type descriptions: the typed counterpart of a schema document.
//!
//! A [`TypeDescription`] is what a language front-end hands to the reflector
//! (one entry per declared field, in declaration order) and what the
//! synthesizer reconstructs from a wire document. The two representations
//! are isomorphic; [`reflect`](crate::reflect) and
//! [`Synthesizer`](crate::Synthesizer) are the mapping functions between
//! them.

use serde::{Deserialize, Serialize};

use crate::document::{SchemaDocument, TypeTag};

/// Primitive field kinds a host type can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Boolean,
    Byte,
}

impl PrimitiveKind {
    /// The wire tag this kind serializes under.
    pub fn tag(&self) -> TypeTag {
        match self {
            PrimitiveKind::Int32 => TypeTag::Int32,
            PrimitiveKind::Int64 => TypeTag::Int64,
            PrimitiveKind::Float32 => TypeTag::Float32,
            PrimitiveKind::Float64 => TypeTag::Float64,
            PrimitiveKind::String => TypeTag::String,
            PrimitiveKind::Boolean => TypeTag::Boolean,
            PrimitiveKind::Byte => TypeTag::Byte,
        }
    }

    /// Whether this kind is numeric (relevant for boxed-numeric rendering).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Float32
                | PrimitiveKind::Float64
        )
    }
}

/// Structural type of a described field.
///
/// # Examples
///
/// ```
/// use collection_schema_core::{PrimitiveKind, PropertyType};
///
/// // A two-dimensional byte array, written directly.
/// let matrix = PropertyType::Binary { dimension: 2 };
///
/// // The same shape written as nested arrays of bytes; normalization
/// // folds it into the binary form.
/// let nested = PropertyType::Array(Box::new(PropertyType::Array(Box::new(
///     PropertyType::Primitive(PrimitiveKind::Byte),
/// ))));
/// assert_eq!(nested.normalized(), matrix);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// A primitive value.
    Primitive(PrimitiveKind),
    /// Raw binary data; `dimension` counts array nesting, so a plain byte
    /// sequence is dimension 1 and a list of byte sequences is dimension 2.
    Binary {
        dimension: u32,
    },
    /// Homogeneous array of an element type.
    Array(Box<PropertyType>),
    /// Embedded structured type, carried as a full schema document with an
    /// empty primary key.
    Object(SchemaDocument),
    /// Closed, ordered set of string values.
    Enum(Vec<String>),
}

impl PropertyType {
    /// Folds byte sequences into the binary form.
    ///
    /// `Array(Byte)` becomes `Binary { dimension: 1 }` and each further
    /// array wrapper raises the dimension by one. Other shapes are
    /// normalized element-wise and otherwise left alone.
    pub fn normalized(self) -> PropertyType {
        match self {
            PropertyType::Array(element) => match element.normalized() {
                PropertyType::Primitive(PrimitiveKind::Byte) => {
                    PropertyType::Binary { dimension: 1 }
                }
                PropertyType::Binary { dimension } => PropertyType::Binary {
                    dimension: dimension + 1,
                },
                other => PropertyType::Array(Box::new(other)),
            },
            other => other,
        }
    }

    /// Whether this type is a numeric primitive.
    pub fn is_numeric(&self) -> bool {
        matches!(self, PropertyType::Primitive(kind) if kind.is_numeric())
    }
}

/// One declared field of a host type.
///
/// Use [`new`](FieldDescription::new) and chain the `with_*` methods:
///
/// ```
/// use collection_schema_core::{FieldDescription, PrimitiveKind, PropertyType};
///
/// let id = FieldDescription::new("id", PropertyType::Primitive(PrimitiveKind::Int64))
///     .with_primary_key(1)
///     .auto_generated();
/// assert!(id.is_primary_key());
/// assert_eq!(id.primary_key_rank, Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// Declared field name.
    pub name: String,
    /// Wire-name override; the display name defaults to the declared name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_name: Option<String>,
    /// Structural type.
    pub property: PropertyType,
    /// 1-based primary-key rank; `None` for non-key fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key_rank: Option<u32>,
    /// Whether the database generates the value on insert.
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_generate: bool,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FieldDescription {
    /// Creates a non-key field with the given name and type.
    pub fn new(name: &str, property: PropertyType) -> Self {
        Self {
            name: name.to_string(),
            wire_name: None,
            property,
            primary_key_rank: None,
            auto_generate: false,
            description: None,
        }
    }

    /// Overrides the wire name.
    pub fn with_wire_name(mut self, name: &str) -> Self {
        self.wire_name = Some(name.to_string());
        self
    }

    /// Marks the field as a primary-key member with a 1-based rank.
    pub fn with_primary_key(mut self, rank: u32) -> Self {
        self.primary_key_rank = Some(rank);
        self
    }

    /// Marks the value as database-generated.
    pub fn auto_generated(mut self) -> Self {
        self.auto_generate = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Whether the field is a primary-key member.
    pub fn is_primary_key(&self) -> bool {
        self.primary_key_rank.is_some()
    }

    /// The name the field travels under on the wire.
    pub fn display_name(&self) -> &str {
        self.wire_name.as_deref().unwrap_or(&self.name)
    }
}

/// Description of a host type: its name, optional schema-name override,
/// and fields in declaration order.
///
/// # Examples
///
/// ```
/// use collection_schema_core::{
///     FieldDescription, PrimitiveKind, PropertyType, TypeDescription,
/// };
///
/// let user = TypeDescription::new("User")
///     .with_field(
///         FieldDescription::new("id", PropertyType::Primitive(PrimitiveKind::Int64))
///             .with_primary_key(1),
///     )
///     .with_field(FieldDescription::new(
///         "name",
///         PropertyType::Primitive(PrimitiveKind::String),
///     ));
///
/// assert_eq!(user.field_names(), vec!["id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescription {
    /// Simple name of the type (e.g. `UserAccount`).
    pub name: String,
    /// Explicit collection-name override; replaces the derived title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescription>,
}

impl TypeDescription {
    /// Creates an empty description for the named type.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema_name: None,
            description: None,
            fields: Vec::new(),
        }
    }

    /// Overrides the derived collection name.
    pub fn with_schema_name(mut self, name: &str) -> Self {
        self.schema_name = Some(name.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Appends a field, preserving declaration order.
    pub fn with_field(mut self, field: FieldDescription) -> Self {
        self.fields.push(field);
        self
    }

    /// Declared field names in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Finds a field by declared name.
    pub fn find_field(&self, name: &str) -> Option<&FieldDescription> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Key fields sorted by rank.
    pub fn key_fields(&self) -> Vec<&FieldDescription> {
        let mut keys: Vec<&FieldDescription> =
            self.fields.iter().filter(|f| f.is_primary_key()).collect();
        keys.sort_by_key(|f| f.primary_key_rank);
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_folds_byte_arrays() {
        let bytes = PropertyType::Array(Box::new(PropertyType::Primitive(PrimitiveKind::Byte)));
        assert_eq!(bytes.normalized(), PropertyType::Binary { dimension: 1 });

        let nested = PropertyType::Array(Box::new(PropertyType::Array(Box::new(
            PropertyType::Primitive(PrimitiveKind::Byte),
        ))));
        assert_eq!(nested.normalized(), PropertyType::Binary { dimension: 2 });

        let wrapped_binary =
            PropertyType::Array(Box::new(PropertyType::Binary { dimension: 1 }));
        assert_eq!(
            wrapped_binary.normalized(),
            PropertyType::Binary { dimension: 2 }
        );
    }

    #[test]
    fn test_normalization_leaves_other_arrays_alone() {
        let strings =
            PropertyType::Array(Box::new(PropertyType::Primitive(PrimitiveKind::String)));
        assert_eq!(strings.clone().normalized(), strings);
    }

    #[test]
    fn test_key_fields_sorted_by_rank() {
        let ty = TypeDescription::new("Order")
            .with_field(
                FieldDescription::new("b", PropertyType::Primitive(PrimitiveKind::String))
                    .with_primary_key(2),
            )
            .with_field(
                FieldDescription::new("a", PropertyType::Primitive(PrimitiveKind::String))
                    .with_primary_key(1),
            )
            .with_field(FieldDescription::new(
                "note",
                PropertyType::Primitive(PrimitiveKind::String),
            ));

        let keys: Vec<&str> = ty.key_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_display_name_defaults_to_declared_name() {
        let field = FieldDescription::new("id", PropertyType::Primitive(PrimitiveKind::Int64));
        assert_eq!(field.display_name(), "id");

        let renamed = field.with_wire_name("user_id");
        assert_eq!(renamed.display_name(), "user_id");
    }
}
