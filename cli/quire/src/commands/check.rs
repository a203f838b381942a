//! `quire check` — dry-run cycle validation.

use anyhow::{bail, Result};
use quire_core::DocumentId;
use quire_store::DirStore;
use quire_verify::would_create_cycle;

/// Check whether saving `id` with the proposed includes would close a cycle.
///
/// Prints the verdict; a positive result is an error so scripts get a
/// non-zero exit code.
pub fn run(store: &DirStore, id: &str, includes: &[String]) -> Result<()> {
    let subject = DocumentId::new(id);
    let proposed: Vec<DocumentId> = includes.iter().map(DocumentId::new).collect();

    if would_create_cycle(store, &subject, &proposed)? {
        bail!("'{subject}' with these includes would create an inclusion cycle");
    }
    println!("OK: '{subject}' can include {} document(s)", proposed.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_store::DocumentStore;

    #[test]
    fn check_accepts_acyclic_proposal() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        run(&store, "a", &["b".to_string()]).unwrap();
    }

    #[test]
    fn check_rejects_back_edge() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        store
            .commit_edges(&DocumentId::new("a"), &[DocumentId::new("b")])
            .unwrap();

        assert!(run(&store, "b", &["a".to_string()]).is_err());
    }

    #[test]
    fn check_accepts_empty_proposal() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        run(&store, "a", &[]).unwrap();
    }
}
