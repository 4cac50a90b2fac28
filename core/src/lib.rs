//! Core schema engine for document collections.
//!
//! This crate is a bidirectional compiler between a host type description
//! and a document database's declarative, JSON-based wire schema, plus the
//! compatibility gate for schema evolution:
//!
//! - [`SchemaDocument`] — canonical wire schema of one collection (ordered
//!   properties, closed-schema policy, ordered primary key).
//! - [`TypeDescription`] — the isomorphic, host-language-neutral structural
//!   description of a type.
//! - [`reflect`] — maps a type description to its schema document.
//! - [`Synthesizer`] — maps a schema document back to a [`TypeBlueprint`]
//!   (type description plus constructor, accessor, builder, and equality
//!   artifacts) for a per-language renderer, resolving inheritance through
//!   a [`SchemaRegistry`].
//! - [`check_compatibility`] — applies the fixed, ordered evolution rule
//!   set to a before/after document pair and reports the first violation.
//!
//! Everything is a pure, synchronous transformation over immutable inputs;
//! no component holds cross-call state or performs I/O beyond serde.
//!
//! # Example
//!
//! ```
//! use collection_schema_core::*;
//!
//! // Describe a host type and reflect it to a wire schema.
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
//!
//! // Synthesize it back; the round trip preserves the description.
//! let blueprint = synthesize(&doc, &GenerateOptions::default()).unwrap();
//! assert_eq!(blueprint.description, account);
//!
//! // Gate an evolution of the document.
//! let mut next = doc.clone();
//! next.properties.insert("email".to_string(), SchemaProperty::string());
//! assert!(check_compatibility(&doc, &next).is_ok());
//! ```

pub mod convert;
pub mod naming;

mod blueprint;
mod catalog;
mod describe;
mod document;
mod error;
mod options;
mod reflect;
mod registry;
mod synthesize;
mod validate;

pub use blueprint::{
    AccessorPair, BuilderBlueprint, ConstructorParam, EnumBlueprint, EqualityContract,
    TypeBlueprint,
};
pub use catalog::{SCHEMA_CONTRACT_VERSION, SchemaCatalog};
pub use describe::{FieldDescription, PrimitiveKind, PropertyType, TypeDescription};
pub use document::{
    MAX_NESTING_DEPTH, PropertyFormat, SchemaDocument, SchemaProperty, TypeTag,
};
pub use error::{Result, SchemaError};
pub use options::{ClassNameSource, GenerateOptions};
pub use reflect::reflect;
pub use registry::SchemaRegistry;
pub use synthesize::{Synthesizer, synthesize};
pub use validate::{COMPAT_RULES, CompatRule, CompatibilityError, check_compatibility};
