//! Resolution error types.

use quire_core::DocumentId;
use quire_store::StoreError;

/// Errors that can occur during include resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// An inclusion directive names a document absent from the store.
    /// Fatal to the whole resolution; there is no partial output.
    #[error("referenced document not found: {id}")]
    ReferenceNotFound { id: DocumentId },

    /// Inclusion nesting exceeded the configured limit.
    #[error("inclusion depth limit of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// The store failed underneath the resolver.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;
