//! Declarative output of the synthesizer.
//!
//! A [`TypeBlueprint`] carries everything a per-language renderer needs to
//! emit a host type: the isomorphic [`TypeDescription`], the resolved
//! constructor parameter list, accessor pairs, the equality contract,
//! builder wiring, and blueprints for nested object and enumerated types.
//! Blueprints are plain serializable data; no source text is produced here.

use serde::{Deserialize, Serialize};

use crate::describe::{PropertyType, TypeDescription};

/// One constructor (or builder) parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorParam {
    /// Wire field name.
    pub name: String,
    /// Structural type of the parameter.
    pub property: PropertyType,
    /// Name of the type whose schema declares the field; for inherited
    /// key fields this is an ancestor.
    pub declared_by: String,
}

/// Getter/setter pair for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorPair {
    /// Wire field name.
    pub field: String,
    /// Getter name (the field name).
    pub getter: String,
    /// Setter name (`set_` + the field name).
    pub setter: String,
}

/// Structural equality and hash contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityContract {
    /// Fields covered, in document order.
    pub fields: Vec<String>,
}

/// Builder-type wiring for one synthesized type.
///
/// The parameter list is identical to the constructor's, so a subclass
/// builder threads its inherited key parameters through the parent builder
/// it records here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderBlueprint {
    /// Builder type name (`<TypeName>Builder`).
    pub name: String,
    /// Parent builder name when the schema inherits, `None` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Full constructor parameter list, ancestors first.
    pub parameters: Vec<ConstructorParam>,
}

/// Blueprint for an enumerated type derived from an `enum` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumBlueprint {
    /// PascalCase name derived from the field name.
    pub name: String,
    /// Values in declaration order.
    pub values: Vec<String>,
}

/// Complete declarative description of one synthesized type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBlueprint {
    /// The isomorphic type description (name, fields, key ranks).
    pub description: TypeDescription,
    /// Constructor parameters in resolution order.
    pub constructor: Vec<ConstructorParam>,
    /// Accessor pairs; empty when accessor generation is disabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<AccessorPair>,
    /// Equality contract; `None` when disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equality: Option<EqualityContract>,
    /// Builder wiring; `None` when disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<BuilderBlueprint>,
    /// Runtime type tag (the document title); `None` when disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    /// Whether unknown instance properties are rejected on read.
    pub deny_unknown_properties: bool,
    /// Whether numeric fields are marked for boxed (nullable) rendering.
    pub boxed_numerics: bool,
    /// Blueprints for embedded object types, in field order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_types: Vec<TypeBlueprint>,
    /// Blueprints for enumerated types, in field order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_enums: Vec<EnumBlueprint>,
}

impl TypeBlueprint {
    /// The synthesized type's name.
    pub fn type_name(&self) -> &str {
        &self.description.name
    }

    /// Constructor parameter names in order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.constructor.iter().map(|p| p.name.as_str()).collect()
    }
}
