//! Local-directory store backend.
//!
//! Backs the CLI: one file per document plus a JSON adjacency index.
//! Identifiers double as file stems, so they must be valid file names for
//! this backend; content-addressed hex identifiers always are.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quire_core::DocumentId;

use crate::error::{Result, StoreError};
use crate::store::DocumentStore;

const INDEX_FILE: &str = "index.json";
const DEFAULT_EXTENSION: &str = "qd";

/// A document store rooted at a local directory.
///
/// Layout:
/// ```text
/// <root>/
///   index.json     — adjacency index: id -> outgoing ids
///   <id>.qd        — one document per file
/// ```
pub struct DirStore {
    root: PathBuf,
    extension: String,
}

impl DirStore {
    /// Create a store rooted at the given directory, using the default
    /// `qd` document extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirStore::with_extension(root, DEFAULT_EXTENSION)
    }

    /// Create a store with a custom document extension.
    pub fn with_extension(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        DirStore {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, id: &DocumentId) -> PathBuf {
        self.root.join(format!("{}.{}", id, self.extension))
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Write a document's text, creating the root directory if needed.
    pub fn put_text(&self, id: &DocumentId, text: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.document_path(id), text)?;
        Ok(())
    }

    /// List the identifiers of all stored documents, sorted.
    pub fn list_ids(&self) -> Result<Vec<DocumentId>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(DocumentId::new(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn read_index(&self) -> Result<HashMap<DocumentId, Vec<DocumentId>>> {
        let path = self.index_path();
        if !path.is_file() {
            return Ok(HashMap::new());
        }
        let data = std::fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|e| StoreError::InvalidIndex {
            path,
            detail: e.to_string(),
        })
    }

    fn write_index(&self, index: &HashMap<DocumentId, Vec<DocumentId>>) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.index_path(), serde_json::to_string_pretty(index)?)?;
        Ok(())
    }
}

impl DocumentStore for DirStore {
    fn load_text(&self, id: &DocumentId) -> Result<String> {
        let path = self.document_path(id);
        if !path.is_file() {
            return Err(StoreError::DocumentNotFound { id: id.clone() });
        }
        Ok(std::fs::read_to_string(path)?)
    }

    fn list_adjacency(&self) -> Result<HashMap<DocumentId, Vec<DocumentId>>> {
        let mut index = self.read_index()?;
        index.retain(|_, outgoing| !outgoing.is_empty());
        Ok(index)
    }

    fn commit_edges(&self, id: &DocumentId, outgoing: &[DocumentId]) -> Result<()> {
        let mut index = self.read_index()?;
        if outgoing.is_empty() {
            index.remove(id);
        } else {
            index.insert(id.clone(), outgoing.to_vec());
        }
        self.write_index(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DocumentId {
        DocumentId::new(s)
    }

    #[test]
    fn put_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        store.put_text(&id("beam"), "a = ?\n").unwrap();
        assert_eq!(store.load_text(&id("beam")).unwrap(), "a = ?\n");
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        assert!(matches!(
            store.load_text(&id("nope")),
            Err(StoreError::DocumentNotFound { .. })
        ));
    }

    #[test]
    fn list_ids_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        store.put_text(&id("b"), "").unwrap();
        store.put_text(&id("a"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list_ids().unwrap(), vec![id("a"), id("b")]);
    }

    #[test]
    fn adjacency_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        store.commit_edges(&id("a"), &[id("b"), id("c")]).unwrap();

        let adjacency = store.list_adjacency().unwrap();
        assert_eq!(adjacency.get(&id("a")), Some(&vec![id("b"), id("c")]));
    }

    #[test]
    fn commit_empty_removes_index_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        store.commit_edges(&id("a"), &[id("b")]).unwrap();
        store.commit_edges(&id("a"), &[]).unwrap();
        assert!(store.list_adjacency().unwrap().is_empty());
    }

    #[test]
    fn corrupt_index_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        std::fs::write(dir.path().join(INDEX_FILE), "not json").unwrap();
        assert!(matches!(
            store.list_adjacency(),
            Err(StoreError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::with_extension(dir.path(), "calc");
        store.put_text(&id("x"), "body").unwrap();
        assert!(dir.path().join("x.calc").is_file());
        assert_eq!(store.list_ids().unwrap(), vec![id("x")]);
    }
}
