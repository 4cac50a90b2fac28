//! Error types for schema store operations.
//!
//! Provides a unified error type covering all failure modes: I/O,
//! serialization, core schema errors, and catalog digest verification.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A loaded document failed a core schema operation.
    #[error(transparent)]
    Schema(#[from] collection_schema_core::SchemaError),

    /// A catalog's recorded content digest does not match its schemas.
    #[error("catalog digest mismatch: recorded {recorded}, computed {computed}")]
    DigestMismatch {
        /// Digest recorded in the catalog file.
        recorded: String,
        /// Digest computed from the catalog's schemas.
        computed: String,
    },

    /// A directory source points at something that is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(std::path::PathBuf),

    /// All configured loader sources failed.
    #[error("no schema sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
