//! Compatibility validation between schema versions.
//!
//! The validator decides whether an `after` document is an acceptable
//! evolution of a `before` document. Rules are a fixed, ordered sequence of
//! pure functions applied with short-circuit: the first violated rule is
//! reported and no further rules run, so the gate blocks a release on one
//! clear message instead of aggregating a report.
//!
//! Rule order:
//!
//! 1. **Type stability** — a property present in both documents must keep
//!    its wire type tag.
//! 2. **No removal** — every property of `before` must still exist in
//!    `after`; new properties may be added freely.
//! 3. **Primary-key stability** — the key sequence must be identical
//!    (members and order), and every key name must resolve to a property
//!    of `after`.
//!
//! # Examples
//!
//! ```
//! use collection_schema_core::*;
//!
//! let before = SchemaDocument::new("accounts")
//!     .with_property("id", SchemaProperty::int64())
//!     .with_property("balance", SchemaProperty::float64())
//!     .with_primary_key(["id"]);
//!
//! let mut after = before.clone();
//! after.properties.insert("email".to_string(), SchemaProperty::string());
//! assert!(check_compatibility(&before, &after).is_ok());
//!
//! after.properties["balance"] = SchemaProperty::string();
//! let err = check_compatibility(&before, &after).unwrap_err();
//! assert!(matches!(err, CompatibilityError::IncompatibleFieldType { .. }));
//! ```

use thiserror::Error;

use crate::document::{SchemaDocument, TypeTag};

/// A single compatibility-rule violation.
///
/// Each variant names the offending field where one exists; the `Display`
/// impl is the message the gate prints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompatibilityError {
    /// A property changed its wire type tag between versions.
    #[error("field '{field}' changed type from {before} to {after}")]
    IncompatibleFieldType {
        /// Property name.
        field: String,
        /// Type tag in the before document.
        before: TypeTag,
        /// Type tag in the after document.
        after: TypeTag,
    },
    /// A property of the before document is missing from the after
    /// document.
    #[error("field '{0}' was removed")]
    FieldRemoved(String),
    /// The primary-key sequence changed members or order.
    #[error("primary key changed from [{before}] to [{after}]")]
    PrimaryKeyChanged {
        /// Comma-separated before sequence.
        before: String,
        /// Comma-separated after sequence.
        after: String,
    },
    /// A primary-key name does not resolve to a property of the after
    /// document.
    #[error("primary key field '{0}' is not declared in properties")]
    PrimaryKeyFieldMissing(String),
}

/// One compatibility rule: a pure function over a before/after pair.
pub type CompatRule = fn(&SchemaDocument, &SchemaDocument) -> Result<(), CompatibilityError>;

/// The closed, ordered rule sequence. Order is semantically significant;
/// [`check_compatibility`] applies the rules front to back and stops at the
/// first violation.
pub const COMPAT_RULES: &[CompatRule] = &[
    check_type_stability,
    check_no_removal,
    check_primary_key_stability,
];

/// Decides whether `after` is an acceptable evolution of `before`.
///
/// Pure and side-effect-free; neither input is mutated. Returns the first
/// violated rule's error, or `Ok(())` when every rule passes.
pub fn check_compatibility(
    before: &SchemaDocument,
    after: &SchemaDocument,
) -> Result<(), CompatibilityError> {
    COMPAT_RULES.iter().try_for_each(|rule| rule(before, after))
}

/// Rule 1: properties present in both documents keep their type tag.
fn check_type_stability(
    before: &SchemaDocument,
    after: &SchemaDocument,
) -> Result<(), CompatibilityError> {
    for (name, old) in &before.properties {
        let Some(new) = after.properties.get(name) else {
            continue;
        };
        if old.kind != new.kind {
            return Err(CompatibilityError::IncompatibleFieldType {
                field: name.clone(),
                before: old.kind,
                after: new.kind,
            });
        }
    }
    Ok(())
}

/// Rule 2: no property of the before document may be removed.
fn check_no_removal(
    before: &SchemaDocument,
    after: &SchemaDocument,
) -> Result<(), CompatibilityError> {
    for name in before.properties.keys() {
        if !after.properties.contains_key(name) {
            return Err(CompatibilityError::FieldRemoved(name.clone()));
        }
    }
    Ok(())
}

/// Rule 3: the primary-key sequence is immutable and must resolve.
fn check_primary_key_stability(
    before: &SchemaDocument,
    after: &SchemaDocument,
) -> Result<(), CompatibilityError> {
    if before.primary_key != after.primary_key {
        return Err(CompatibilityError::PrimaryKeyChanged {
            before: before.primary_key.join(", "),
            after: after.primary_key.join(", "),
        });
    }
    for key in &after.primary_key {
        if !after.properties.contains_key(key) {
            return Err(CompatibilityError::PrimaryKeyFieldMissing(key.clone()));
        }
    }
    Ok(())
}
