use serde::{Deserialize, Serialize};

use crate::document::SchemaDocument;
use crate::error::Result;

/// Version of the schema document contract (semver).
///
/// Embedded in every [`SchemaCatalog`] so readers can detect documents
/// written under an incompatible contract.
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Serializable bundle of schema documents for distribution.
///
/// A catalog groups multiple [`SchemaDocument`] values with version metadata
/// and an optional content digest, making it suitable for shipping a
/// database's full schema set as a single JSON file.
///
/// The digest is computed over [`digest_input`](Self::digest_input) by the
/// I/O layer that writes the catalog; the core only carries it.
///
/// # Examples
///
/// ```
/// use collection_schema_core::*;
///
/// let mut catalog = SchemaCatalog::new("0.1.0", "2026-01-15T10:30:00Z");
/// catalog.name = Some("billing".into());
/// catalog.schemas.push(
///     SchemaDocument::new("accounts")
///         .with_property("id", SchemaProperty::int64())
///         .with_primary_key(["id"]),
/// );
///
/// assert_eq!(catalog.schema_count(), 1);
/// assert_eq!(catalog.catalog_version, "0.1.0");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Schema contract version (populated from
    /// [`SCHEMA_CONTRACT_VERSION`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Catalog format version (semver string).
    pub catalog_version: String,
    /// Optional catalog name.
    pub name: Option<String>,
    /// Optional catalog description.
    pub description: Option<String>,
    /// ISO-8601 timestamp for catalog creation.
    pub generated_at: String,
    /// Optional hex digest of the deterministic schema content.
    pub content_digest: Option<String>,
    /// Schema documents included in this catalog.
    pub schemas: Vec<SchemaDocument>,
}

impl SchemaCatalog {
    /// Creates a catalog with required fields.
    ///
    /// The `schema_version` is automatically set from
    /// [`SCHEMA_CONTRACT_VERSION`].
    pub fn new(catalog_version: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            schema_version: Some(SCHEMA_CONTRACT_VERSION.to_string()),
            catalog_version: catalog_version.into(),
            name: None,
            description: None,
            generated_at: generated_at.into(),
            content_digest: None,
            schemas: Vec::new(),
        }
    }

    /// Returns the number of schemas in this catalog.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Serializes the schema documents alone, in order, as the input to a
    /// content digest.
    ///
    /// Timestamps and the digest itself are excluded so rebundling the same
    /// documents always produces the same digest.
    pub fn digest_input(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.schemas)?)
    }
}
