//! `quire expand` — resolve a document to its flat text.

use anyhow::{Context, Result};
use quire_core::document::VALUE_SEPARATOR;
use quire_core::field::{Field, FieldQueue};
use quire_core::DocumentId;
use quire_resolve::Resolver;
use quire_store::DirStore;

/// Resolve `id` and print the expanded text.
///
/// Each `--values` flag contributes one positional field holding its
/// `;`-joined values. With `--raw`, the substitution pass is skipped at
/// every nesting level.
pub fn run(store: &DirStore, max_depth: usize, id: &str, values: &[String], raw: bool) -> Result<()> {
    let text = expand(store, max_depth, id, values, raw)?;
    println!("{text}");
    Ok(())
}

pub(crate) fn expand(
    store: &DirStore,
    max_depth: usize,
    id: &str,
    values: &[String],
    raw: bool,
) -> Result<String> {
    let id = DocumentId::new(id);
    let resolver = Resolver::with_max_depth(store, max_depth);

    let text = if raw {
        resolver.resolve(&id).context("resolving document")?
    } else {
        let mut fields: FieldQueue = values
            .iter()
            .map(|entry| {
                Field::positional(
                    entry
                        .split(VALUE_SEPARATOR)
                        .map(|v| v.trim().to_string())
                        .collect(),
                )
            })
            .collect();
        resolver
            .resolve_with_queue(&id, &mut fields)
            .context("resolving document")?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_store::DocumentStore as _;

    fn store_with(docs: &[(&str, &str)]) -> (tempfile::TempDir, DirStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path().join("docs"));
        for (id, text) in docs {
            store.put_text(&DocumentId::new(*id), text).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn expand_plain_document() {
        let (_dir, store) = store_with(&[("d", "a = 1\nb = 2")]);
        let text = expand(&store, 64, "d", &[], false).unwrap();
        assert_eq!(text, "a = 1\nb = 2");
    }

    #[test]
    fn expand_with_values_fills_markers() {
        let (_dir, store) = store_with(&[("d", "x = ?\ny = ?")]);
        let text = expand(&store, 64, "d", &["3;4".to_string()], false).unwrap();
        assert_eq!(text, "x = ? {3}\ny = ? {4}");
    }

    #[test]
    fn expand_raw_skips_substitution() {
        let (_dir, store) = store_with(&[("d", "x = ?\n\u{000B}p\t3")]);
        let text = expand(&store, 64, "d", &[], true).unwrap();
        assert_eq!(text, "x = ?");
    }

    #[test]
    fn expand_missing_document_fails() {
        let (_dir, store) = store_with(&[]);
        assert!(expand(&store, 64, "ghost", &[], false).is_err());
    }

    #[test]
    fn load_text_still_returns_raw_source() {
        let (_dir, store) = store_with(&[("d", "x = ?\n\u{000B}p\t3")]);
        assert_eq!(
            store.load_text(&DocumentId::new("d")).unwrap(),
            "x = ?\n\u{000B}p\t3"
        );
    }
}
