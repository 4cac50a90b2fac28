//! Bidirectional conversion between typed properties and wire properties.
//!
//! Reflection lowers [`PropertyType`] values into their wire shape and
//! synthesis lifts them back. Binary data is the asymmetric case: a typed
//! `Binary { dimension: n }` lowers to n−1 `array` wrappers around a
//! `string`/`format: byte` leaf, and lifting folds that stack back into a
//! single binary value.

use crate::describe::{PrimitiveKind, PropertyType};
use crate::document::{SchemaDocument, SchemaProperty, TypeTag};
use crate::error::{Result, SchemaError};

/// Lowers a typed property to its wire shape.
///
/// Field-level attributes (description, autoGenerate) are not part of the
/// structural type and are applied by the caller.
///
/// # Examples
///
/// ```
/// use collection_schema_core::convert::property_to_wire;
/// use collection_schema_core::PropertyType;
///
/// let wire = property_to_wire(&PropertyType::Binary { dimension: 2 });
/// let json = serde_json::to_string(&wire).unwrap();
/// assert_eq!(
///     json,
///     r#"{"type":"array","items":{"type":"string","format":"byte"}}"#
/// );
/// ```
pub fn property_to_wire(property: &PropertyType) -> SchemaProperty {
    match property {
        PropertyType::Primitive(kind) => SchemaProperty::primitive(kind.tag()),
        PropertyType::Binary { dimension } => {
            let mut wire = SchemaProperty::binary();
            for _ in 1..*dimension {
                wire = SchemaProperty::array(wire);
            }
            wire
        }
        PropertyType::Array(element) => SchemaProperty::array(property_to_wire(element)),
        PropertyType::Object(document) => {
            let mut wire = SchemaProperty::object(&document.title, document.properties.clone());
            wire.description = document
                .description
                .as_ref()
                .filter(|d| !d.is_empty())
                .cloned();
            wire
        }
        PropertyType::Enum(values) => SchemaProperty::enumeration(values.clone()),
    }
}

/// Lifts a wire property back to its typed shape.
///
/// Array stacks over the binary leaf fold back into `Binary { dimension }`,
/// inverting [`property_to_wire`]. Fails with
/// [`SchemaError::InvalidSchema`] on incoherent wire shapes (an array
/// without `items`, an object without `properties`).
pub fn property_from_wire(property: &SchemaProperty) -> Result<PropertyType> {
    if property.is_binary() {
        return Ok(PropertyType::Binary { dimension: 1 });
    }

    if let Some(values) = &property.enum_values {
        if property.kind == TypeTag::String {
            return Ok(PropertyType::Enum(values.clone()));
        }
    }

    match property.kind {
        TypeTag::Array => {
            let Some(items) = &property.items else {
                return Err(SchemaError::InvalidSchema(
                    "array property is missing items".to_string(),
                ));
            };
            let element = property_from_wire(items)?;
            Ok(PropertyType::Array(Box::new(element)).normalized())
        }
        TypeTag::Object => {
            let Some(properties) = &property.properties else {
                return Err(SchemaError::InvalidSchema(
                    "object property is missing properties".to_string(),
                ));
            };
            let document = SchemaDocument {
                title: property.title.clone().unwrap_or_default(),
                description: property.description.clone(),
                properties: properties.clone(),
                additional_properties: property.additional_properties.unwrap_or(false),
                primary_key: Vec::new(),
            };
            Ok(PropertyType::Object(document))
        }
        TypeTag::Int32 => Ok(PropertyType::Primitive(PrimitiveKind::Int32)),
        TypeTag::Int64 => Ok(PropertyType::Primitive(PrimitiveKind::Int64)),
        TypeTag::Float32 => Ok(PropertyType::Primitive(PrimitiveKind::Float32)),
        TypeTag::Float64 => Ok(PropertyType::Primitive(PrimitiveKind::Float64)),
        TypeTag::String => Ok(PropertyType::Primitive(PrimitiveKind::String)),
        TypeTag::Boolean => Ok(PropertyType::Primitive(PrimitiveKind::Boolean)),
        TypeTag::Byte => Ok(PropertyType::Primitive(PrimitiveKind::Byte)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_dimensions_round_trip() {
        for dimension in 1..=4 {
            let typed = PropertyType::Binary { dimension };
            let wire = property_to_wire(&typed);
            assert_eq!(property_from_wire(&wire).unwrap(), typed);
        }
    }

    #[test]
    fn test_binary_lowering_wraps_dimension_minus_one_arrays() {
        let wire = property_to_wire(&PropertyType::Binary { dimension: 3 });
        let json = serde_json::to_string(&wire).unwrap();
        assert_eq!(
            json,
            r#"{"type":"array","items":{"type":"array","items":{"type":"string","format":"byte"}}}"#
        );
    }

    #[test]
    fn test_enum_round_trip() {
        let typed = PropertyType::Enum(vec!["pending".into(), "shipped".into()]);
        let wire = property_to_wire(&typed);
        let json = serde_json::to_string(&wire).unwrap();
        assert_eq!(json, r#"{"type":"string","enum":["pending","shipped"]}"#);
        assert_eq!(property_from_wire(&wire).unwrap(), typed);
    }

    #[test]
    fn test_object_round_trip_drops_nothing() {
        let nested = SchemaDocument::new("address")
            .with_description("Postal address")
            .with_property("street", SchemaProperty::string())
            .with_property("zip", SchemaProperty::string());

        let typed = PropertyType::Object(nested.clone());
        let wire = property_to_wire(&typed);
        assert_eq!(wire.kind, TypeTag::Object);
        assert_eq!(wire.title.as_deref(), Some("address"));
        assert_eq!(wire.additional_properties, Some(false));

        let lifted = property_from_wire(&wire).unwrap();
        assert_eq!(lifted, typed);
    }

    #[test]
    fn test_lifting_folds_handwritten_byte_arrays() {
        let wire = SchemaProperty::array(SchemaProperty::primitive(TypeTag::Byte));
        assert_eq!(
            property_from_wire(&wire).unwrap(),
            PropertyType::Binary { dimension: 1 }
        );
    }

    #[test]
    fn test_array_without_items_is_rejected() {
        let wire = SchemaProperty::primitive(TypeTag::Array);
        assert!(property_from_wire(&wire).is_err());
    }
}
