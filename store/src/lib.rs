//! Filesystem layer for collection schema documents.
//!
//! This crate loads and saves the documents the core engine operates on:
//! individual schema JSON files, directories of them, and single-file
//! catalogs with content-digest verification.
//!
//! # Quick start
//!
//! ```no_run
//! use collection_schema_store::SchemaStore;
//!
//! // Load schemas from a directory
//! let store = SchemaStore::from_dir("schemas/").unwrap();
//! if let Some(doc) = store.get("accounts") {
//!     println!("accounts has {} properties", doc.properties.len());
//! }
//!
//! // Use the builder for fallback chains
//! let store = SchemaStore::builder()
//!     .from_dir("schemas/")
//!     .from_catalog("catalog.json")
//!     .build()
//!     .unwrap();
//!
//! // Bridge into the core's registry for synthesis
//! let registry = store.registry();
//! ```

mod catalog;
mod error;
mod loader;

pub use catalog::{bundle_catalog, content_digest, load_catalog, save_catalog};
pub use error::{Result, StoreError};
pub use loader::{SchemaStore, StoreBuilder, StoreSource, load_document, save_document};
