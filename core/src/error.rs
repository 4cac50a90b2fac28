//! Error types for schema engine operations.
//!
//! Provides a unified error type covering reflection, synthesis, and
//! serialization failure modes. Compatibility rule violations have their own
//! type, [`CompatibilityError`](crate::CompatibilityError), since they name a
//! specific evolution rule rather than a malformed input.

use thiserror::Error;

/// Errors that can occur while reflecting, synthesizing, or serializing
/// schema documents.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A type description or schema document violates a structural
    /// invariant (duplicate fields, broken key ranks, misplaced
    /// auto-generate markers, malformed properties).
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A field or ancestor schema could not be resolved during synthesis,
    /// or the inheritance graph is cyclic or too deep.
    #[error("schema resolution failed: {0}")]
    SchemaResolution(String),

    /// JSON encoding or decoding failure.
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
