//! Store error types.

use std::path::PathBuf;

use quire_core::DocumentId;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested document is not in the store.
    #[error("document not found: {id}")]
    DocumentNotFound { id: DocumentId },

    /// The adjacency index is unreadable.
    #[error("invalid adjacency index at {path}: {detail}")]
    InvalidIndex { path: PathBuf, detail: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
