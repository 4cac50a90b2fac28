//! Catalog file I/O with content-digest verification.
//!
//! A catalog is the single-file distribution form of a schema set. Writing
//! stamps a SHA-256 digest over the serialized schema documents; loading
//! recomputes and compares it, so a manually edited or corrupted catalog is
//! rejected before any of its documents are used.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::Utc;
use collection_schema_core::{SchemaCatalog, SchemaDocument};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Computes the SHA-256 hex digest of a catalog's schema content.
///
/// Only the schema documents feed the digest; timestamps and catalog
/// metadata are excluded, so rebundling identical documents reproduces the
/// digest.
pub fn content_digest(catalog: &SchemaCatalog) -> Result<String> {
    let input = catalog.digest_input()?;
    let hash = Sha256::digest(&input);
    Ok(format!("{hash:x}"))
}

/// Bundles documents into a catalog stamped with the current time and its
/// content digest.
///
/// # Examples
///
/// ```
/// use collection_schema_core::{SchemaDocument, SchemaProperty};
/// use collection_schema_store::bundle_catalog;
///
/// let docs = vec![
///     SchemaDocument::new("accounts")
///         .with_property("id", SchemaProperty::int64())
///         .with_primary_key(["id"]),
/// ];
/// let catalog = bundle_catalog(docs, "0.1.0", Some("billing".into()), None).unwrap();
/// assert_eq!(catalog.schema_count(), 1);
/// assert!(catalog.content_digest.is_some());
/// ```
pub fn bundle_catalog(
    schemas: Vec<SchemaDocument>,
    catalog_version: &str,
    name: Option<String>,
    description: Option<String>,
) -> Result<SchemaCatalog> {
    let mut catalog = SchemaCatalog::new(catalog_version, Utc::now().to_rfc3339());
    catalog.name = name;
    catalog.description = description;
    catalog.schemas = schemas;
    catalog.content_digest = Some(content_digest(&catalog)?);
    Ok(catalog)
}

/// Saves a catalog as pretty-printed JSON.
pub fn save_catalog(catalog: &SchemaCatalog, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, catalog)?;
    debug!(
        path = %path.as_ref().display(),
        schemas = catalog.schema_count(),
        "saved schema catalog"
    );
    Ok(())
}

/// Loads a catalog from a JSON file, verifying its content digest when one
/// is recorded.
///
/// # Errors
///
/// Returns [`StoreError::DigestMismatch`] when the recorded digest does not
/// match the loaded schemas, [`StoreError::Io`] when the file cannot be
/// read, or [`StoreError::Json`] when parsing fails.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<SchemaCatalog> {
    let file = std::fs::File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let catalog: SchemaCatalog = serde_json::from_reader(reader)?;

    if let Some(recorded) = &catalog.content_digest {
        let computed = content_digest(&catalog)?;
        if recorded != &computed {
            return Err(StoreError::DigestMismatch {
                recorded: recorded.clone(),
                computed,
            });
        }
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use collection_schema_core::SchemaProperty;

    use super::*;

    fn sample_docs() -> Vec<SchemaDocument> {
        vec![
            SchemaDocument::new("accounts")
                .with_property("id", SchemaProperty::int64())
                .with_primary_key(["id"]),
            SchemaDocument::new("orders")
                .with_property("id", SchemaProperty::int64())
                .with_property("total", SchemaProperty::float64())
                .with_primary_key(["id"]),
        ]
    }

    #[test]
    fn test_catalog_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog = bundle_catalog(sample_docs(), "0.1.0", None, None).unwrap();
        save_catalog(&catalog, &path).unwrap();

        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded.schema_count(), 2);
        assert_eq!(loaded.content_digest, catalog.content_digest);
        assert_eq!(loaded.schemas[1].property_names(), vec!["id", "total"]);
    }

    #[test]
    fn test_tampered_catalog_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog = bundle_catalog(sample_docs(), "0.1.0", None, None).unwrap();
        save_catalog(&catalog, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, raw.replace("\"total\"", "\"amount\"")).unwrap();

        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, StoreError::DigestMismatch { .. }));
    }

    #[test]
    fn test_catalog_without_digest_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut catalog = bundle_catalog(sample_docs(), "0.1.0", None, None).unwrap();
        catalog.content_digest = None;
        save_catalog(&catalog, &path).unwrap();

        assert_eq!(load_catalog(&path).unwrap().schema_count(), 2);
    }

    #[test]
    fn test_digest_is_stable_across_rebundles() {
        let a = bundle_catalog(sample_docs(), "0.1.0", None, None).unwrap();
        let b = bundle_catalog(sample_docs(), "0.2.0", Some("named".into()), None).unwrap();
        assert_eq!(a.content_digest, b.content_digest);
    }
}
