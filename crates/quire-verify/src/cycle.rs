//! Cycle detection over include adjacency, via Kahn's algorithm.
//!
//! Topological peeling is preferred over depth-first search for its
//! natural termination property (all nodes visited means acyclic) and
//! because it re-runs cheaply against a fresh adjacency snapshot on every
//! save.

use std::collections::{HashMap, HashSet, VecDeque};

use quire_core::DocumentId;
use quire_store::{DocumentStore, StoreError};

/// Errors that can occur during cycle validation.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Committing the proposed edges would make the include graph cyclic.
    #[error("inclusion cycle rejected for document {id}")]
    CycleRejected { id: DocumentId },

    /// The store failed underneath the detector.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for cycle validation.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// True when the adjacency mapping contains at least one cycle.
///
/// The node set is every identifier appearing as a source or a target;
/// documents with no outgoing edges may be absent from the mapping.
pub fn has_cycle(adjacency: &HashMap<DocumentId, Vec<DocumentId>>) -> bool {
    let mut nodes: HashSet<&DocumentId> = HashSet::new();
    for (from, targets) in adjacency {
        nodes.insert(from);
        nodes.extend(targets);
    }

    let mut in_degree: HashMap<&DocumentId, usize> = nodes.iter().map(|&n| (n, 0)).collect();
    for targets in adjacency.values() {
        for to in targets {
            if let Some(degree) = in_degree.get_mut(to) {
                *degree += 1;
            }
        }
    }

    let mut queue: VecDeque<&DocumentId> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&node, _)| node)
        .collect();

    let mut visited = 0usize;
    while let Some(node) = queue.pop_front() {
        visited += 1;
        let Some(targets) = adjacency.get(node) else {
            continue;
        };
        for to in targets {
            if let Some(degree) = in_degree.get_mut(to) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(to);
                }
            }
        }
    }

    visited != nodes.len()
}

/// Would saving `subject` with the `proposed` outgoing edges create a cycle?
///
/// An empty proposal can never close a cycle and returns `false` without
/// touching the store. Otherwise one adjacency snapshot is taken and the
/// subject's proposed edges replace whatever adjacency it had; snapshot
/// and overlay are combined in this single call, with no interleaved
/// mutation of the subject's own entry.
pub fn would_create_cycle<S: DocumentStore>(
    store: &S,
    subject: &DocumentId,
    proposed: &[DocumentId],
) -> Result<bool> {
    if proposed.is_empty() {
        return Ok(false);
    }
    let mut adjacency = store.list_adjacency()?;
    adjacency.insert(subject.clone(), proposed.to_vec());
    Ok(has_cycle(&adjacency))
}

/// The write contract: commit the proposed edges only when safe.
///
/// Returns [`VerifyError::CycleRejected`] and leaves the store untouched
/// when the proposal would close a cycle. The caller's transaction
/// discipline must still prevent a concurrent write to the same subject
/// between check and commit.
pub fn commit_checked<S: DocumentStore>(
    store: &S,
    subject: &DocumentId,
    proposed: &[DocumentId],
) -> Result<()> {
    if would_create_cycle(store, subject, proposed)? {
        return Err(VerifyError::CycleRejected {
            id: subject.clone(),
        });
    }
    store.commit_edges(subject, proposed)?;
    Ok(())
}
