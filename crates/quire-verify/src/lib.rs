//! Write-time include-graph cycle validation.
//!
//! Before a document's outgoing inclusion edges are persisted, the
//! proposed edge set is overlaid on a snapshot of the stored adjacency
//! and checked for cycles with Kahn's algorithm. The detector itself
//! performs no writes; [`commit_checked`] packages the check-then-commit
//! contract for write paths.

pub mod cycle;

// Re-exports for convenience.
pub use cycle::{commit_checked, has_cycle, would_create_cycle, Result, VerifyError};
