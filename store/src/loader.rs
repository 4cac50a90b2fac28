//! Schema store loading with builder pattern and fallback chains.
//!
//! Provides [`SchemaStore`] for in-memory schema lookup and [`StoreBuilder`]
//! for constructing a store from multiple sources with automatic fallback.
//!
//! # Loading patterns
//!
//! ```no_run
//! use collection_schema_store::SchemaStore;
//!
//! // Load from a directory of JSON schema files
//! let store = SchemaStore::from_dir("schemas/").unwrap();
//! assert!(store.get("accounts").is_some());
//!
//! // Load from a single catalog file
//! let store = SchemaStore::from_catalog("catalog.json").unwrap();
//!
//! // Use the builder for a fallback chain
//! let store = SchemaStore::builder()
//!     .from_dir("schemas/")
//!     .from_catalog("catalog.json")
//!     .build()
//!     .unwrap();
//! ```
//!
//! Documents keep the order they were loaded in; directory loads are sorted
//! by file name so the same directory always produces the same store.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use collection_schema_core::{SchemaDocument, SchemaRegistry};
use indexmap::IndexMap;
use tracing::debug;

use crate::catalog::load_catalog;
use crate::error::{Result, StoreError};

/// Describes where a [`SchemaStore`] was loaded from.
#[derive(Debug, Clone)]
pub enum StoreSource {
    /// Loaded from a directory of individual JSON schema files.
    Directory(PathBuf),
    /// Loaded from a single catalog JSON file.
    Catalog(PathBuf),
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<StoreSource>),
}

#[derive(Debug, Clone)]
struct StoreEntry {
    document: SchemaDocument,
    origin: Option<String>,
}

/// In-memory, insertion-ordered collection of schema documents keyed by
/// title.
///
/// Directory loads additionally record each document's origin file stem,
/// which the synthesizer's file-based naming option consumes through
/// [`registry`](Self::registry).
///
/// # Examples
///
/// ```no_run
/// use collection_schema_store::SchemaStore;
///
/// let store = SchemaStore::from_dir("schemas/").unwrap();
/// println!("Loaded {} schemas", store.len());
///
/// if let Some(doc) = store.get("accounts") {
///     println!("accounts has {} properties", doc.properties.len());
/// }
/// ```
#[derive(Debug)]
pub struct SchemaStore {
    entries: IndexMap<String, StoreEntry>,
    source: StoreSource,
}

impl SchemaStore {
    /// Returns a new [`StoreBuilder`] for configuring a fallback chain.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Loads schemas from a directory of `*.json` files.
    ///
    /// Files are read in sorted name order; each is parsed as a
    /// [`SchemaDocument`] and indexed by its `title`, with the file stem
    /// recorded as the document's origin.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be read or a file
    /// cannot be opened, or [`StoreError::Json`] if any file contains
    /// invalid JSON.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() && !path.is_dir() {
            return Err(StoreError::NotADirectory(path.to_path_buf()));
        }
        let mut paths: Vec<PathBuf> = std::fs::read_dir(path)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut entries = IndexMap::new();
        for file_path in &paths {
            let document = load_document(file_path)?;
            let origin = file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(ToOwned::to_owned);
            entries.insert(document.title.clone(), StoreEntry { document, origin });
        }

        debug!(dir = %path.display(), schemas = entries.len(), "loaded schema directory");
        Ok(Self {
            entries,
            source: StoreSource::Directory(path.to_path_buf()),
        })
    }

    /// Loads schemas from a single catalog JSON file, verifying its
    /// content digest when one is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DigestMismatch`] if the catalog's digest does
    /// not match its schemas, [`StoreError::Io`] if the file cannot be
    /// read, or [`StoreError::Json`] if parsing fails.
    pub fn from_catalog(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let catalog = load_catalog(path)?;

        let mut entries = IndexMap::new();
        for document in catalog.schemas {
            entries.insert(
                document.title.clone(),
                StoreEntry {
                    document,
                    origin: None,
                },
            );
        }

        debug!(path = %path.display(), schemas = entries.len(), "loaded schema catalog");
        Ok(Self {
            entries,
            source: StoreSource::Catalog(path.to_path_buf()),
        })
    }

    /// Looks up a document by collection title.
    pub fn get(&self, title: &str) -> Option<&SchemaDocument> {
        self.entries.get(title).map(|entry| &entry.document)
    }

    /// The origin file stem a document was loaded from, if recorded.
    pub fn origin_of(&self, title: &str) -> Option<&str> {
        self.entries.get(title)?.origin.as_deref()
    }

    /// Inserts a document, replacing any existing entry for the same title.
    pub fn insert(&mut self, document: SchemaDocument) {
        self.entries.insert(
            document.title.clone(),
            StoreEntry {
                document,
                origin: None,
            },
        );
    }

    /// Returns `true` if the store contains a document titled `title`.
    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(title)
    }

    /// Returns the number of documents in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store contains no documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collection titles in load order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Documents in load order.
    pub fn documents(&self) -> impl Iterator<Item = &SchemaDocument> {
        self.entries.values().map(|entry| &entry.document)
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &StoreSource {
        &self.source
    }

    /// Validates the structural integrity of every loaded document,
    /// returning the first failure.
    ///
    /// Loading itself is lenient so partially written schema sets can
    /// still be inspected; callers that require well-formed documents run
    /// this after loading.
    pub fn validate(&self) -> Result<()> {
        for entry in self.entries.values() {
            entry.document.validate()?;
        }
        Ok(())
    }

    /// Builds a [`SchemaRegistry`] over the store's documents, carrying
    /// origin stems through for file-based type naming.
    ///
    /// Parent links are not part of the wire format and are left for the
    /// caller to declare on the returned registry.
    pub fn registry(&self) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        for (title, entry) in &self.entries {
            match &entry.origin {
                Some(origin) => registry.insert_from(entry.document.clone(), origin),
                None => registry.insert(entry.document.clone()),
            }
            debug!(schema = %title, "registered schema");
        }
        registry
    }
}

/// Loads a single schema document from a JSON file.
pub fn load_document(path: impl AsRef<Path>) -> Result<SchemaDocument> {
    let file = std::fs::File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let document = serde_json::from_reader(reader)?;
    Ok(document)
}

/// Saves a schema document as pretty-printed JSON.
pub fn save_document(document: &SchemaDocument, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, document)?;
    Ok(())
}

/// Builder for constructing a [`SchemaStore`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`StoreError::NoSourcesAvailable`] is returned.
///
/// # Example
///
/// ```no_run
/// use collection_schema_store::SchemaStore;
///
/// let store = SchemaStore::builder()
///     .from_dir("/opt/schemas/")
///     .from_catalog("/opt/catalog.json")
///     .build()
///     .unwrap();
/// ```
pub struct StoreBuilder {
    sources: Vec<StoreSource>,
}

impl StoreBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a directory of JSON schema files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(StoreSource::Directory(path.into()));
        self
    }

    /// Adds a catalog file as a source.
    pub fn from_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(StoreSource::Catalog(path.into()));
        self
    }

    /// Attempts to load schemas from configured sources in order.
    ///
    /// Returns the first successfully loaded store. If all sources fail,
    /// returns [`StoreError::NoSourcesAvailable`].
    pub fn build(self) -> Result<SchemaStore> {
        if self.sources.is_empty() {
            return Err(StoreError::NoSourcesAvailable);
        }

        let all_sources = self.sources.clone();

        for source in &self.sources {
            let result = match source {
                StoreSource::Directory(path) => SchemaStore::from_dir(path),
                StoreSource::Catalog(path) => SchemaStore::from_catalog(path),
                StoreSource::Multiple(_) => continue,
            };

            match result {
                Ok(mut store) => {
                    store.source = StoreSource::Multiple(all_sources);
                    return Ok(store);
                }
                Err(err) => {
                    debug!(error = %err, "schema source failed, trying next");
                }
            }
        }

        Err(StoreError::NoSourcesAvailable)
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
