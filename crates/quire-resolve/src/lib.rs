//! Recursive include resolution for the quire engine.
//!
//! The resolver turns one stored document into a single flat text: it
//! splits body from form, filters lines through the scope flag, splices
//! in recursively expanded inclusions, and fills input-field markers from
//! the field queue. It is a pure function over store state; resolution
//! never writes.

pub mod error;
pub mod resolver;

// Re-exports for convenience.
pub use error::{ResolveError, Result};
pub use resolver::{Resolver, DEFAULT_MAX_DEPTH};
