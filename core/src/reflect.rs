//! Type reflection: host-type descriptions to wire schema documents.
//!
//! Reflection is deterministic and order-preserving: properties appear in
//! field declaration order, the primary-key sequence follows the declared
//! 1-based ranks, and serializing the result twice yields byte-identical
//! output. Structural problems (broken ranks, misplaced auto-generate
//! markers, duplicate names) fail fast instead of producing a partial
//! document.
//!
//! # Examples
//!
//! ```
//! use collection_schema_core::*;
//!
//! let account = TypeDescription::new("UserAccount")
//!     .with_field(
//!         FieldDescription::new("id", PropertyType::Primitive(PrimitiveKind::Int64))
//!             .with_primary_key(1)
//!             .auto_generated(),
//!     )
//!     .with_field(FieldDescription::new(
//!         "name",
//!         PropertyType::Primitive(PrimitiveKind::String),
//!     ));
//!
//! let doc = reflect(&account).unwrap();
//! assert_eq!(doc.title, "user_accounts");
//! assert_eq!(doc.primary_key, vec!["id"]);
//! assert!(!doc.additional_properties);
//! ```

use std::collections::HashSet;

use tracing::debug;

use crate::convert::property_to_wire;
use crate::describe::{FieldDescription, PropertyType, TypeDescription};
use crate::document::{MAX_NESTING_DEPTH, SchemaDocument};
use crate::error::{Result, SchemaError};
use crate::naming::{pluralize, to_snake_case};

/// Maps a type description to its canonical schema document.
///
/// The title defaults to the pluralized, underscore-separated form of the
/// type's simple name; an explicit schema-name override replaces it
/// verbatim. Byte sequences fold into the binary property form, and the
/// output always carries `additionalProperties: false`.
pub fn reflect(description: &TypeDescription) -> Result<SchemaDocument> {
    let title = derive_title(description)?;

    check_ranks(description)?;

    let mut document = SchemaDocument::new(&title);
    document.description = description
        .description
        .as_ref()
        .filter(|d| !d.is_empty())
        .cloned();

    let mut seen: HashSet<&str> = HashSet::new();
    for field in &description.fields {
        let name = field.display_name();
        if name.trim().is_empty() {
            return Err(SchemaError::InvalidSchema(format!(
                "field '{}' has an empty wire name",
                field.name
            )));
        }
        if !seen.insert(name) {
            return Err(SchemaError::InvalidSchema(format!(
                "duplicate field name '{name}'"
            )));
        }
        if field.auto_generate && !field.is_primary_key() {
            return Err(SchemaError::InvalidSchema(format!(
                "autoGenerate is only valid on primary-key fields, found on '{name}'"
            )));
        }
        // The wire carries one description per property; on object
        // properties that slot belongs to the embedded document.
        if matches!(field.property, PropertyType::Object(_)) && field.description.is_some() {
            return Err(SchemaError::InvalidSchema(format!(
                "field '{name}' embeds a structured type; describe the embedded type instead \
                 of the field"
            )));
        }

        check_structure(name, &field.property, 0)?;

        let normalized = field.property.clone().normalized();
        if normalized != field.property {
            debug!(field = name, "folded byte sequence into binary form");
        }

        let mut wire = property_to_wire(&normalized);
        if let Some(desc) = field.description.as_ref().filter(|d| !d.is_empty()) {
            wire.description = Some(desc.clone());
        }
        wire.auto_generate = field.auto_generate;
        document.properties.insert(name.to_string(), wire);
    }

    document.primary_key = description
        .key_fields()
        .iter()
        .map(|field| field.display_name().to_string())
        .collect();
    document.additional_properties = false;

    Ok(document)
}

fn derive_title(description: &TypeDescription) -> Result<String> {
    if let Some(name) = &description.schema_name {
        if name.trim().is_empty() {
            return Err(SchemaError::InvalidSchema(
                "explicit schema name cannot be empty".to_string(),
            ));
        }
        return Ok(name.clone());
    }

    let derived = pluralize(&to_snake_case(&description.name));
    if derived.is_empty() {
        return Err(SchemaError::InvalidSchema(format!(
            "type name '{}' produces an empty title",
            description.name
        )));
    }
    Ok(derived)
}

/// Verifies that primary-key ranks form a contiguous 1-based sequence.
fn check_ranks(description: &TypeDescription) -> Result<()> {
    let mut ranked: Vec<(u32, &FieldDescription)> = description
        .fields
        .iter()
        .filter_map(|field| field.primary_key_rank.map(|rank| (rank, field)))
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);

    let mut expected = 1u32;
    let mut previous: Option<u32> = None;
    for (rank, field) in &ranked {
        if previous == Some(*rank) {
            return Err(SchemaError::InvalidSchema(format!(
                "duplicate primary key rank {rank} on field '{}'",
                field.name
            )));
        }
        if *rank != expected {
            return Err(SchemaError::InvalidSchema(format!(
                "primary key rank {rank} on field '{}' breaks the contiguous sequence \
                 (expected {expected})",
                field.name
            )));
        }
        previous = Some(*rank);
        expected += 1;
    }

    Ok(())
}

/// Checks the structural shape of a field's property tree: bounds array
/// nesting depth, rejects zero-dimension binary data, and rejects embedded
/// documents that declare primary keys.
fn check_structure(field: &str, property: &PropertyType, depth: usize) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(SchemaError::InvalidSchema(format!(
            "field '{field}' exceeds the maximum nesting depth of {MAX_NESTING_DEPTH}"
        )));
    }

    match property {
        PropertyType::Array(element) => check_structure(field, element, depth + 1),
        PropertyType::Binary { dimension } => {
            if *dimension == 0 {
                return Err(SchemaError::InvalidSchema(format!(
                    "binary field '{field}' must have a dimension of at least 1"
                )));
            }
            Ok(())
        }
        PropertyType::Object(document) => {
            if !document.primary_key.is_empty() {
                return Err(SchemaError::InvalidSchema(format!(
                    "embedded type '{}' on field '{field}' must not declare a primary key",
                    document.title
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use crate::describe::PrimitiveKind;

    use super::*;

    fn field(name: &str, property: PropertyType) -> FieldDescription {
        FieldDescription::new(name, property)
    }

    fn string_field(name: &str) -> FieldDescription {
        field(name, PropertyType::Primitive(PrimitiveKind::String))
    }

    #[test]
    fn test_title_is_pluralized_snake_case() {
        let doc = reflect(&TypeDescription::new("UserAccount")).unwrap();
        assert_eq!(doc.title, "user_accounts");

        let doc = reflect(&TypeDescription::new("Company")).unwrap();
        assert_eq!(doc.title, "companies");
    }

    #[test]
    fn test_explicit_schema_name_wins() {
        let description = TypeDescription::new("UserAccount").with_schema_name("accounts_v2");
        let doc = reflect(&description).unwrap();
        assert_eq!(doc.title, "accounts_v2");
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let description = TypeDescription::new("Order")
            .with_field(string_field("zeta"))
            .with_field(string_field("alpha"))
            .with_field(string_field("mid"));

        let doc = reflect(&description).unwrap();
        assert_eq!(doc.property_names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_primary_key_follows_ranks_not_declaration_order() {
        let description = TypeDescription::new("Order")
            .with_field(string_field("b").with_primary_key(2))
            .with_field(string_field("a").with_primary_key(1))
            .with_field(string_field("c").with_primary_key(3));

        let doc = reflect(&description).unwrap();
        assert_eq!(doc.primary_key, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rank_gap_is_rejected() {
        let description = TypeDescription::new("Order")
            .with_field(string_field("a").with_primary_key(1))
            .with_field(string_field("c").with_primary_key(3));

        let err = reflect(&description).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
        assert!(err.to_string().contains("rank 3"));
    }

    #[test]
    fn test_duplicate_rank_is_rejected() {
        let description = TypeDescription::new("Order")
            .with_field(string_field("a").with_primary_key(1))
            .with_field(string_field("b").with_primary_key(1));

        let err = reflect(&description).unwrap_err();
        assert!(err.to_string().contains("duplicate primary key rank"));
    }

    #[test]
    fn test_rank_not_starting_at_one_is_rejected() {
        let description =
            TypeDescription::new("Order").with_field(string_field("a").with_primary_key(2));

        assert!(reflect(&description).is_err());
    }

    #[test]
    fn test_auto_generate_on_non_key_field_is_rejected() {
        let description =
            TypeDescription::new("Order").with_field(string_field("note").auto_generated());

        let err = reflect(&description).unwrap_err();
        assert!(err.to_string().contains("autoGenerate"));
    }

    #[test]
    fn test_byte_sequences_fold_to_binary() {
        let description = TypeDescription::new("Blob").with_field(field(
            "payload",
            PropertyType::Array(Box::new(PropertyType::Primitive(PrimitiveKind::Byte))),
        ));

        let doc = reflect(&description).unwrap();
        assert!(doc.get("payload").unwrap().is_binary());
    }

    #[test]
    fn test_binary_dimension_serializes_as_nested_arrays() {
        let description = TypeDescription::new("Blob")
            .with_field(field("matrix", PropertyType::Binary { dimension: 3 }));

        let doc = reflect(&description).unwrap();
        let json = serde_json::to_value(doc.get("matrix").unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "array",
                "items": {
                    "type": "array",
                    "items": {"type": "string", "format": "byte"}
                }
            })
        );
    }

    #[test]
    fn test_wire_name_override_is_used() {
        let description =
            TypeDescription::new("User").with_field(string_field("userName").with_wire_name("name"));

        let doc = reflect(&description).unwrap();
        assert_eq!(doc.property_names(), vec!["name"]);
    }

    #[test]
    fn test_duplicate_wire_names_are_rejected() {
        let description = TypeDescription::new("User")
            .with_field(string_field("a").with_wire_name("name"))
            .with_field(string_field("name"));

        assert!(reflect(&description).is_err());
    }

    #[test]
    fn test_zero_dimension_binary_is_rejected() {
        let description = TypeDescription::new("Blob")
            .with_field(field("payload", PropertyType::Binary { dimension: 0 }));

        let err = reflect(&description).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
        assert!(err.to_string().contains("dimension"));

        // The same malformed leaf nested under an array wrapper.
        let wrapped = TypeDescription::new("Blob").with_field(field(
            "payload",
            PropertyType::Array(Box::new(PropertyType::Binary { dimension: 0 })),
        ));
        assert!(reflect(&wrapped).is_err());
    }

    #[test]
    fn test_object_field_description_is_rejected() {
        let nested = SchemaDocument::new("address")
            .with_property("street", crate::document::SchemaProperty::string());
        let description = TypeDescription::new("Outer").with_field(
            field("address", PropertyType::Object(nested)).with_description("Where it sits"),
        );

        let err = reflect(&description).unwrap_err();
        assert!(err.to_string().contains("describe the embedded type"));
    }

    #[test]
    fn test_embedded_description_is_not_overwritten() {
        let nested = SchemaDocument::new("address")
            .with_description("Postal address")
            .with_property("street", crate::document::SchemaProperty::string());
        let description = TypeDescription::new("Outer")
            .with_field(field("address", PropertyType::Object(nested)));

        let doc = reflect(&description).unwrap();
        assert_eq!(
            doc.get("address").unwrap().description.as_deref(),
            Some("Postal address")
        );
    }

    #[test]
    fn test_embedded_primary_key_is_rejected() {
        let nested = SchemaDocument::new("inner")
            .with_property("id", crate::document::SchemaProperty::int64())
            .with_primary_key(["id"]);
        let description =
            TypeDescription::new("Outer").with_field(field("inner", PropertyType::Object(nested)));

        let err = reflect(&description).unwrap_err();
        assert!(err.to_string().contains("must not declare a primary key"));
    }

    #[test]
    fn test_reflection_is_deterministic() {
        let description = TypeDescription::new("UserAccount")
            .with_description("Accounts")
            .with_field(string_field("id").with_primary_key(1).auto_generated())
            .with_field(string_field("name").with_description("Display name"))
            .with_field(field("balance", PropertyType::Primitive(PrimitiveKind::Float64)));

        let first = reflect(&description).unwrap().to_json_pretty().unwrap();
        let second = reflect(&description).unwrap().to_json_pretty().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generated_documents_are_closed() {
        let doc = reflect(&TypeDescription::new("User").with_field(string_field("name"))).unwrap();
        assert!(!doc.additional_properties);
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"additionalProperties\":false"));
    }
}
