//! Schema synthesis: wire documents back to host-type blueprints.
//!
//! The synthesizer inverts [`reflect`](crate::reflect): given a schema
//! document it rebuilds the [`TypeDescription`] (same field order, key
//! ranks, and auto-generate markers) and layers the generation artifacts a
//! renderer needs on top. Inheritance context comes from a
//! [`SchemaRegistry`]; constructor parameters thread ancestor key fields
//! parent-first through the chain.
//!
//! # Examples
//!
//! ```
//! use collection_schema_core::*;
//!
//! let doc = SchemaDocument::new("users")
//!     .with_property("id", SchemaProperty::int64().auto_generated())
//!     .with_property("name", SchemaProperty::string())
//!     .with_primary_key(["id"]);
//!
//! let blueprint = synthesize(&doc, &GenerateOptions::default()).unwrap();
//! assert_eq!(blueprint.type_name(), "User");
//! assert_eq!(blueprint.parameter_names(), vec!["id"]);
//! ```

use indexmap::IndexMap;
use tracing::debug;

use crate::blueprint::{
    AccessorPair, BuilderBlueprint, ConstructorParam, EnumBlueprint, EqualityContract,
    TypeBlueprint,
};
use crate::convert::property_from_wire;
use crate::describe::{FieldDescription, PropertyType, TypeDescription};
use crate::document::{MAX_NESTING_DEPTH, SchemaDocument, SchemaProperty, TypeTag};
use crate::error::{Result, SchemaError};
use crate::naming::{pluralize, singularize, to_pascal_case, to_snake_case};
use crate::options::{ClassNameSource, GenerateOptions};
use crate::registry::SchemaRegistry;

/// Synthesizes a standalone document with no inheritance context.
pub fn synthesize(document: &SchemaDocument, options: &GenerateOptions) -> Result<TypeBlueprint> {
    let registry = SchemaRegistry::new();
    Synthesizer::new(&registry)
        .with_options(options.clone())
        .synthesize(document)
}

/// Maps schema documents to type blueprints.
///
/// Borrows a [`SchemaRegistry`] for ancestor and origin lookups and owns
/// the [`GenerateOptions`] controlling which artifacts are emitted.
///
/// # Examples
///
/// ```
/// use collection_schema_core::*;
///
/// let base = SchemaDocument::new("tenants")
///     .with_property("tenant_id", SchemaProperty::string())
///     .with_primary_key(["tenant_id"]);
/// let derived = SchemaDocument::new("orders")
///     .with_property("id", SchemaProperty::int64())
///     .with_primary_key(["tenant_id", "id"]);
///
/// let mut registry = SchemaRegistry::new();
/// registry.insert(base);
/// registry.insert(derived.clone());
/// registry.link_parent("orders", "tenants").unwrap();
///
/// let blueprint = Synthesizer::new(&registry).synthesize(&derived).unwrap();
/// assert_eq!(blueprint.parameter_names(), vec!["tenant_id", "id"]);
/// ```
#[derive(Debug)]
pub struct Synthesizer<'a> {
    registry: &'a SchemaRegistry,
    options: GenerateOptions,
}

impl<'a> Synthesizer<'a> {
    /// Creates a synthesizer with default options.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            options: GenerateOptions::default(),
        }
    }

    /// Replaces the generation options.
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Synthesizes a blueprint for the given document.
    pub fn synthesize(&self, document: &SchemaDocument) -> Result<TypeBlueprint> {
        let blueprint = self.synthesize_at(document, 0)?;
        debug!(
            schema = %document.title,
            type_name = blueprint.type_name(),
            parameters = blueprint.constructor.len(),
            "synthesized type blueprint"
        );
        Ok(blueprint)
    }

    fn synthesize_at(&self, document: &SchemaDocument, depth: usize) -> Result<TypeBlueprint> {
        if depth > MAX_NESTING_DEPTH {
            return Err(SchemaError::SchemaResolution(format!(
                "schema '{}' exceeds the maximum nesting depth of {MAX_NESTING_DEPTH}",
                document.title
            )));
        }

        let type_name = self.type_name(document);
        let mut description = TypeDescription::new(&type_name);
        description.description = document
            .description
            .as_ref()
            .filter(|d| !d.is_empty())
            .cloned();
        if pluralize(&to_snake_case(&type_name)) != document.title {
            description.schema_name = Some(document.title.clone());
        }

        let mut nested_types = Vec::new();
        let mut nested_enums = Vec::new();
        for (name, wire) in &document.properties {
            let property = property_from_wire(wire)?;

            match structural_leaf(&property) {
                PropertyType::Object(nested) => {
                    nested_types.push(self.synthesize_nested(name, nested, depth + 1)?);
                }
                PropertyType::Enum(values) => {
                    nested_enums.push(EnumBlueprint {
                        name: to_pascal_case(name),
                        values: values.clone(),
                    });
                }
                _ => {}
            }

            let mut field = FieldDescription::new(name, property);
            field.primary_key_rank = document
                .primary_key
                .iter()
                .position(|key| key == name)
                .map(|index| index as u32 + 1);
            field.auto_generate = wire.auto_generate;
            if wire.kind != TypeTag::Object {
                field.description = wire
                    .description
                    .as_ref()
                    .filter(|d| !d.is_empty())
                    .cloned();
            }
            description.fields.push(field);
        }

        let constructor = if self.options.required_only_constructor {
            self.key_constructor(document)?
        } else {
            self.all_fields_constructor(document)?
        };

        let accessors = if self.options.include_accessors {
            document
                .properties
                .keys()
                .map(|name| AccessorPair {
                    field: name.clone(),
                    getter: name.clone(),
                    setter: format!("set_{name}"),
                })
                .collect()
        } else {
            Vec::new()
        };

        let equality = self.options.include_equality_contract.then(|| EqualityContract {
            fields: document.properties.keys().cloned().collect(),
        });

        let builder = self.options.generate_builders.then(|| {
            let parent = self
                .registry
                .parent_of(&document.title)
                .and_then(|title| self.registry.get(title))
                .map(|parent| format!("{}Builder", self.type_name(parent)));
            BuilderBlueprint {
                name: format!("{type_name}Builder"),
                parent,
                parameters: constructor.clone(),
            }
        });

        Ok(TypeBlueprint {
            description,
            constructor,
            accessors,
            equality,
            builder,
            discriminator: self
                .options
                .include_type_discriminator
                .then(|| document.title.clone()),
            deny_unknown_properties: self.options.treat_unknown_properties_as_error,
            boxed_numerics: !self.options.use_primitive_numeric_types,
            nested_types,
            nested_enums,
        })
    }

    fn synthesize_nested(
        &self,
        field: &str,
        nested: &SchemaDocument,
        depth: usize,
    ) -> Result<TypeBlueprint> {
        if nested.title.trim().is_empty() {
            let mut named = nested.clone();
            named.title = to_snake_case(field);
            return self.synthesize_at(&named, depth);
        }
        self.synthesize_at(nested, depth)
    }

    /// Resolves the synthesized type name per the class-name source.
    fn type_name(&self, document: &SchemaDocument) -> String {
        if self.options.class_name_source == ClassNameSource::FileName {
            if let Some(origin) = self.registry.origin_of(&document.title) {
                return to_pascal_case(origin);
            }
        }
        to_pascal_case(&singularize(&document.title))
    }

    /// Constructor parameters restricted to primary-key fields, threaded
    /// through the inheritance chain parent-first.
    fn key_constructor(&self, document: &SchemaDocument) -> Result<Vec<ConstructorParam>> {
        let chain = self.registry.ancestry(document)?;

        // Nearest declaration wins: later chain entries overwrite their
        // ancestors' properties.
        let mut declarations: IndexMap<&str, (&SchemaDocument, &SchemaProperty)> = IndexMap::new();
        for doc in &chain {
            for (name, property) in &doc.properties {
                declarations.insert(name.as_str(), (doc, property));
            }
        }

        let mut params: Vec<ConstructorParam> = Vec::new();
        for doc in &chain {
            for key in &doc.primary_key {
                if params.iter().any(|param| &param.name == key) {
                    continue;
                }
                let Some((owner, property)) = declarations.get(key.as_str()) else {
                    return Err(SchemaError::SchemaResolution(format!(
                        "primary key field '{key}' of '{}' cannot be resolved on the type or \
                         any ancestor",
                        doc.title
                    )));
                };
                params.push(ConstructorParam {
                    name: key.clone(),
                    property: property_from_wire(property)?,
                    declared_by: self.type_name(owner),
                });
            }
        }

        Ok(params)
    }

    /// Constructor parameters covering every field, ancestors first; the
    /// first contribution wins on name collisions.
    fn all_fields_constructor(&self, document: &SchemaDocument) -> Result<Vec<ConstructorParam>> {
        let chain = self.registry.ancestry(document)?;

        let mut params: Vec<ConstructorParam> = Vec::new();
        for doc in &chain {
            for (name, property) in &doc.properties {
                if params.iter().any(|param| &param.name == name) {
                    continue;
                }
                params.push(ConstructorParam {
                    name: name.clone(),
                    property: property_from_wire(property)?,
                    declared_by: self.type_name(doc),
                });
            }
        }

        Ok(params)
    }
}

/// Skips array wrappers to the structural leaf of a property.
fn structural_leaf(property: &PropertyType) -> &PropertyType {
    match property {
        PropertyType::Array(element) => structural_leaf(element),
        other => other,
    }
}
