//! `quire list` — enumerate stored documents and their include edges.

use anyhow::Result;
use quire_core::DocumentId;
use quire_store::{DirStore, DocumentStore};

/// Print every stored document, with its outgoing includes when present.
///
/// With `json`, emits a machine-readable object: one entry per document
/// with its outgoing identifiers.
pub fn run(store: &DirStore, json: bool) -> Result<()> {
    let ids = store.list_ids()?;
    let adjacency = store.list_adjacency()?;

    if json {
        let entries: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "includes": adjacency.get(id).cloned().unwrap_or_default(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if ids.is_empty() {
        println!("store is empty");
        return Ok(());
    }
    for id in ids {
        match adjacency.get(&id) {
            Some(outgoing) => {
                let list: Vec<&str> = outgoing.iter().map(DocumentId::as_str).collect();
                println!("{id} -> {}", list.join(", "));
            }
            None => println!("{id}"),
        }
    }
    Ok(())
}
