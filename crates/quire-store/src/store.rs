//! Store trait and the in-memory backend.
//!
//! The `DocumentStore` trait abstracts over persistence backends (memory,
//! local directory, remote services). The engine only ever needs three
//! operations: load a document's text, snapshot the include adjacency,
//! and commit a validated edge set.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use quire_core::DocumentId;

use crate::error::{Result, StoreError};

/// Abstract document store.
///
/// Resolution is read-only; [`DocumentStore::commit_edges`] is the single
/// write in the contract and must only be called after a negative cycle
/// check.
pub trait DocumentStore {
    /// Load the raw text of a document.
    ///
    /// Returns [`StoreError::DocumentNotFound`] when the identifier is
    /// absent.
    fn load_text(&self, id: &DocumentId) -> Result<String>;

    /// Snapshot the include adjacency: every document that declares at
    /// least one outgoing edge, mapped to its outgoing identifiers.
    ///
    /// Documents without outgoing edges may be absent from the mapping;
    /// consumers must tolerate that.
    fn list_adjacency(&self) -> Result<HashMap<DocumentId, Vec<DocumentId>>>;

    /// Persist the outgoing edge list of a document.
    fn commit_edges(&self, id: &DocumentId, outgoing: &[DocumentId]) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
struct Entry {
    text: String,
    outgoing: Vec<DocumentId>,
}

/// An in-memory document store.
///
/// The primary test double, also usable for embedding the engine without
/// any persistence. Insertion is content-addressed by default.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<DocumentId, Entry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Insert a document under a content-addressed identifier and return it.
    pub fn insert(&self, text: impl Into<String>) -> DocumentId {
        let text = text.into();
        let id = DocumentId::from_content(&text);
        self.insert_with_id(id.clone(), text);
        id
    }

    /// Insert or replace a document under an explicit identifier.
    pub fn insert_with_id(&self, id: impl Into<DocumentId>, text: impl Into<String>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(id.into()).or_default();
        entry.text = text.into();
    }

    /// True when the identifier is present.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn load_text(&self, id: &DocumentId) -> Result<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(id)
            .map(|entry| entry.text.clone())
            .ok_or_else(|| StoreError::DocumentNotFound { id: id.clone() })
    }

    fn list_adjacency(&self) -> Result<HashMap<DocumentId, Vec<DocumentId>>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries
            .iter()
            .filter(|(_, entry)| !entry.outgoing.is_empty())
            .map(|(id, entry)| (id.clone(), entry.outgoing.clone()))
            .collect())
    }

    fn commit_edges(&self, id: &DocumentId, outgoing: &[DocumentId]) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(id.clone()).or_default();
        entry.outgoing = outgoing.to_vec();
        Ok(())
    }
}
