//! Document store contract and backends for the quire engine.
//!
//! The engine reads documents and adjacency data through the
//! [`DocumentStore`] trait and never mutates them itself; the only write
//! in the contract is [`DocumentStore::commit_edges`], which the caller
//! invokes after a negative cycle check. Two backends are provided: an
//! in-memory store for tests and embedding, and a local-directory store
//! backing the CLI.

pub mod dir;
pub mod error;
pub mod store;

// Re-exports for convenience.
pub use dir::DirStore;
pub use error::{Result, StoreError};
pub use store::{DocumentStore, MemoryStore};
