//! `quire add` — import a document, validating its include edges.

use std::path::Path;

use anyhow::{bail, Context, Result};
use quire_core::document::Document;
use quire_core::scan::{classify, LineKind};
use quire_core::DocumentId;
use quire_store::{DirStore, DocumentStore};
use quire_verify::would_create_cycle;

/// Import a file into the store under `explicit_id` or its file stem.
///
/// The document's declared include edges are extracted from its body and
/// cycle-checked first; on rejection the store is left untouched.
pub fn run(store: &DirStore, file: &Path, explicit_id: Option<&str>) -> Result<()> {
    let text =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;

    let id = match explicit_id {
        Some(id) => DocumentId::new(id),
        None => match file.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => DocumentId::new(stem),
            None => bail!("cannot derive an identifier from {}", file.display()),
        },
    };

    let outgoing = collect_includes(&text);
    if would_create_cycle(store, &id, &outgoing)? {
        bail!("rejected: saving '{id}' with these includes would create an inclusion cycle");
    }

    store.put_text(&id, &text)?;
    store.commit_edges(&id, &outgoing)?;

    if outgoing.is_empty() {
        println!("Added '{id}'");
    } else {
        let list: Vec<&str> = outgoing.iter().map(DocumentId::as_str).collect();
        println!("Added '{id}' (includes: {})", list.join(", "));
    }
    Ok(())
}

/// Extract the outgoing include identifiers declared in a document's body.
///
/// Scope regions do not matter here: an edge hidden behind `#local`
/// still anchors the graph. Duplicates are dropped, order preserved.
pub(crate) fn collect_includes(text: &str) -> Vec<DocumentId> {
    let (body, _) = Document::split_form(text);
    let mut seen = Vec::new();
    for line in body.lines() {
        if let LineKind::Include(directive) = classify(line) {
            let id = DocumentId::new(directive.resolved_target());
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
    }
    seen
}
