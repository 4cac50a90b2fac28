//! In-memory registry of schema documents with inheritance edges.
//!
//! The registry maps collection titles to documents and records two pieces
//! of synthesis context the wire format does not carry: parent edges
//! (schema inheritance) and origin file stems (file-based type naming).
//! Ancestor resolution is an explicit graph walk with a visited set, so
//! cyclic or dangling parent links surface as
//! [`SchemaError::SchemaResolution`] instead of unbounded recursion.
//!
//! # Examples
//!
//! ```
//! use collection_schema_core::{SchemaDocument, SchemaProperty, SchemaRegistry};
//!
//! let base = SchemaDocument::new("tenants")
//!     .with_property("tenant_id", SchemaProperty::string())
//!     .with_primary_key(["tenant_id"]);
//! let derived = SchemaDocument::new("orders")
//!     .with_property("id", SchemaProperty::int64())
//!     .with_primary_key(["tenant_id", "id"]);
//!
//! let mut registry = SchemaRegistry::new();
//! registry.insert(base);
//! registry.insert(derived.clone());
//! registry.link_parent("orders", "tenants").unwrap();
//!
//! let chain = registry.ancestry(&derived).unwrap();
//! let titles: Vec<&str> = chain.iter().map(|d| d.title.as_str()).collect();
//! assert_eq!(titles, vec!["tenants", "orders"]);
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::document::{MAX_NESTING_DEPTH, SchemaDocument};
use crate::error::{Result, SchemaError};

#[derive(Debug, Clone)]
struct RegistryEntry {
    document: SchemaDocument,
    parent: Option<String>,
    origin: Option<String>,
}

/// Ordered collection of schema documents keyed by title.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document under its title, replacing any previous entry.
    pub fn insert(&mut self, document: SchemaDocument) {
        self.entries.insert(
            document.title.clone(),
            RegistryEntry {
                document,
                parent: None,
                origin: None,
            },
        );
    }

    /// Registers a document along with the file stem it was loaded from.
    pub fn insert_from(&mut self, document: SchemaDocument, origin: &str) {
        self.entries.insert(
            document.title.clone(),
            RegistryEntry {
                document,
                parent: None,
                origin: Some(origin.to_string()),
            },
        );
    }

    /// Records `parent` as the immediate ancestor of `child`.
    ///
    /// The child must already be registered; the parent may be registered
    /// later, and a dangling link only fails once the chain is walked.
    pub fn link_parent(&mut self, child: &str, parent: &str) -> Result<()> {
        if child == parent {
            return Err(SchemaError::SchemaResolution(format!(
                "schema '{child}' cannot inherit from itself"
            )));
        }
        let Some(entry) = self.entries.get_mut(child) else {
            return Err(SchemaError::SchemaResolution(format!(
                "cannot link unknown schema '{child}'"
            )));
        };
        entry.parent = Some(parent.to_string());
        Ok(())
    }

    /// Looks up a document by title.
    pub fn get(&self, title: &str) -> Option<&SchemaDocument> {
        self.entries.get(title).map(|entry| &entry.document)
    }

    /// The immediate parent title of a schema, if linked.
    pub fn parent_of(&self, title: &str) -> Option<&str> {
        self.entries.get(title)?.parent.as_deref()
    }

    /// The origin file stem a schema was loaded from, if recorded.
    pub fn origin_of(&self, title: &str) -> Option<&str> {
        self.entries.get(title)?.origin.as_deref()
    }

    /// Registered titles in insertion order.
    pub fn titles(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves the inheritance chain of a document, root-first, ending
    /// with the document itself.
    ///
    /// The document does not have to be registered; parent edges are
    /// looked up under its title. Each ancestor is visited exactly once:
    /// a repeated title is a cycle and a missing ancestor is a dangling
    /// link, both reported as [`SchemaError::SchemaResolution`].
    pub fn ancestry<'a>(&'a self, document: &'a SchemaDocument) -> Result<Vec<&'a SchemaDocument>> {
        let mut chain: Vec<&SchemaDocument> = vec![document];
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(document.title.as_str());

        let mut current = self.parent_of(&document.title);
        let mut depth = 0usize;
        while let Some(parent_title) = current {
            depth += 1;
            if depth > MAX_NESTING_DEPTH {
                return Err(SchemaError::SchemaResolution(format!(
                    "inheritance chain of '{}' exceeds the maximum depth of {MAX_NESTING_DEPTH}",
                    document.title
                )));
            }
            if !visited.insert(parent_title) {
                return Err(SchemaError::SchemaResolution(format!(
                    "inheritance cycle detected at '{parent_title}'"
                )));
            }
            let Some(entry) = self.entries.get(parent_title) else {
                return Err(SchemaError::SchemaResolution(format!(
                    "parent schema '{parent_title}' is not registered"
                )));
            };
            chain.push(&entry.document);
            current = entry.parent.as_deref();
        }

        chain.reverse();
        debug!(
            schema = %document.title,
            ancestors = chain.len() - 1,
            "resolved inheritance chain"
        );
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use crate::document::SchemaProperty;

    use super::*;

    fn doc(title: &str) -> SchemaDocument {
        SchemaDocument::new(title).with_property("id", SchemaProperty::int64())
    }

    #[test]
    fn test_ancestry_is_root_first() {
        let mut registry = SchemaRegistry::new();
        registry.insert(doc("roots"));
        registry.insert(doc("mids"));
        registry.insert(doc("leaves"));
        registry.link_parent("mids", "roots").unwrap();
        registry.link_parent("leaves", "mids").unwrap();

        let leaf = registry.get("leaves").unwrap().clone();
        let chain = registry.ancestry(&leaf).unwrap();
        let titles: Vec<&str> = chain.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["roots", "mids", "leaves"]);
    }

    #[test]
    fn test_unregistered_document_resolves_standalone() {
        let registry = SchemaRegistry::new();
        let lone = doc("lones");
        let chain = registry.ancestry(&lone).unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut registry = SchemaRegistry::new();
        registry.insert(doc("as"));
        registry.insert(doc("bs"));
        registry.link_parent("as", "bs").unwrap();
        registry.link_parent("bs", "as").unwrap();

        let a = registry.get("as").unwrap().clone();
        let err = registry.ancestry(&a).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaResolution(_)));
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_dangling_parent_is_reported() {
        let mut registry = SchemaRegistry::new();
        registry.insert(doc("children"));
        registry.link_parent("children", "ghosts").unwrap();

        let child = registry.get("children").unwrap().clone();
        let err = registry.ancestry(&child).unwrap_err();
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn test_self_parent_is_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.insert(doc("loops"));
        assert!(registry.link_parent("loops", "loops").is_err());
    }

    #[test]
    fn test_linking_unknown_child_is_rejected() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.link_parent("missing", "parent").is_err());
    }

    #[test]
    fn test_titles_keep_insertion_order() {
        let mut registry = SchemaRegistry::new();
        registry.insert(doc("zs"));
        registry.insert(doc("as"));
        assert_eq!(registry.titles(), vec!["zs", "as"]);
    }
}
