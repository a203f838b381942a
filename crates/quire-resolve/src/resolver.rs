//! The include resolver.

use quire_core::document::Document;
use quire_core::field::{Field, FieldQueue};
use quire_core::scan::{classify, LineKind};
use quire_core::subst::{has_markers, substitute_line};
use quire_core::DocumentId;
use quire_store::{DocumentStore, StoreError};

use crate::error::{ResolveError, Result};

/// Default inclusion nesting limit.
///
/// Write-time cycle validation keeps the persisted graph acyclic, but
/// resolution must not rely on every write path having enforced it; the
/// limit bounds recursion independently.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Expands a stored document into one flat text.
///
/// The resolver holds no per-resolution state: the scope flag and field
/// queue travel through each call, so concurrent resolutions over the
/// same store cannot contaminate one another.
pub struct Resolver<'a, S: DocumentStore> {
    store: &'a S,
    max_depth: usize,
}

impl<'a, S: DocumentStore> Resolver<'a, S> {
    /// Create a resolver over a store with the default depth limit.
    pub fn new(store: &'a S) -> Self {
        Resolver {
            store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Create a resolver with a custom depth limit.
    pub fn with_max_depth(store: &'a S, max_depth: usize) -> Self {
        Resolver { store, max_depth }
    }

    /// Expand a document without any substitution pass.
    ///
    /// Scope filtering and inclusion splicing still apply; input-field
    /// markers are left untouched at every nesting level.
    pub fn resolve(&self, id: &DocumentId) -> Result<String> {
        self.expand(id, None, 0)
    }

    /// Expand a document, filling input-field markers from `fields`.
    ///
    /// The queue is consumed front to back; values the document does not
    /// consume remain in the queue for the caller. Fields declared by the
    /// document's own form section beyond the caller's values are
    /// appended per the reconciliation rule.
    pub fn resolve_with_queue(&self, id: &DocumentId, fields: &mut FieldQueue) -> Result<String> {
        self.expand(id, Some(fields), 0)
    }

    fn expand(
        &self,
        id: &DocumentId,
        mut fields: Option<&mut FieldQueue>,
        depth: usize,
    ) -> Result<String> {
        if depth >= self.max_depth {
            return Err(ResolveError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let text = self.store.load_text(id).map_err(|e| match e {
            StoreError::DocumentNotFound { id } => ResolveError::ReferenceNotFound { id },
            other => ResolveError::Store(other),
        })?;
        let (body, form) = Document::split_form(&text);

        if let (Some(queue), Some(form)) = (fields.as_deref_mut(), form) {
            queue.reconcile(FieldQueue::from_form(form));
        }

        // The scope flag is per document and starts global; it never
        // inherits from the including caller.
        let mut local = false;
        let mut lines: Vec<String> = Vec::new();
        for line in body.lines() {
            match classify(line) {
                LineKind::LocalScope => local = true,
                LineKind::GlobalScope => local = false,
                _ if local => {}
                LineKind::Include(directive) => {
                    let child = DocumentId::new(directive.resolved_target());
                    let expanded = if fields.is_some() {
                        // The child starts from a fresh queue seeded only
                        // with the directive's inline values; its own form
                        // fields join during reconciliation.
                        let mut child_queue = FieldQueue::new();
                        if directive.has_values() {
                            child_queue.push_back(Field::positional(directive.values().to_vec()));
                        }
                        self.expand(&child, Some(&mut child_queue), depth + 1)?
                    } else {
                        self.expand(&child, None, depth + 1)?
                    };
                    lines.push(expanded);
                }
                LineKind::Content => lines.push(line.to_string()),
            }
        }

        // A single trailing blank is an artifact of splitting the body at
        // the form separator; drop it, but only one and only then.
        if form.is_some() && lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        if let Some(queue) = fields {
            for line in &mut lines {
                if queue.is_empty() {
                    break;
                }
                if !has_markers(line) {
                    continue;
                }
                if let Some(rebuilt) = substitute_line(line.trim_end(), queue) {
                    *line = rebuilt;
                }
            }
        }

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_store::MemoryStore;

    fn id(s: &str) -> DocumentId {
        DocumentId::new(s)
    }

    fn queue_of(values: &[&str]) -> FieldQueue {
        [Field::positional(
            values.iter().map(|v| v.to_string()).collect(),
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn plain_document_passes_through() {
        let store = MemoryStore::new();
        store.insert_with_id("d", "a = 1\nb = a + 1");
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.resolve(&id("d")).unwrap(), "a = 1\nb = a + 1");
    }

    #[test]
    fn resolution_is_idempotent_without_inclusions() {
        let store = MemoryStore::new();
        store.insert_with_id("d", "a = 1\n#local\nhidden\n#global\nb = 2");
        let resolver = Resolver::new(&store);
        let first = resolver.resolve(&id("d")).unwrap();
        let second = resolver.resolve(&id("d")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn local_scope_lines_are_suppressed_in_order() {
        let store = MemoryStore::new();
        store.insert_with_id(
            "d",
            "one\n#local\ntwo\nthree\n#global\nfour\n#LOCAL\nfive\n#Global\nsix",
        );
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.resolve(&id("d")).unwrap(), "one\nfour\nsix");
    }

    #[test]
    fn inclusion_splices_child_text() {
        let store = MemoryStore::new();
        store.insert_with_id("child", "c1\nc2");
        store.insert_with_id("parent", "p1\n#include child\np2");
        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver.resolve(&id("parent")).unwrap(),
            "p1\nc1\nc2\np2"
        );
    }

    #[test]
    fn local_scope_hides_from_parent_but_resets_per_document() {
        let store = MemoryStore::new();
        store.insert_with_id("child", "#local\nprivate\n#global\npublic");
        store.insert_with_id("parent", "#include child\nafter");
        let resolver = Resolver::new(&store);
        // The child's local region is invisible to the parent; the
        // child's flag starts global regardless of the parent's state.
        assert_eq!(resolver.resolve(&id("parent")).unwrap(), "public\nafter");
    }

    #[test]
    fn parent_local_scope_suppresses_inclusion_directives() {
        let store = MemoryStore::new();
        store.insert_with_id("child", "never");
        store.insert_with_id("parent", "#local\n#include child\n#global\nkept");
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.resolve(&id("parent")).unwrap(), "kept");
    }

    #[test]
    fn missing_reference_aborts_resolution() {
        let store = MemoryStore::new();
        store.insert_with_id("parent", "ok\n#include ghost");
        let resolver = Resolver::new(&store);
        match resolver.resolve(&id("parent")) {
            Err(ResolveError::ReferenceNotFound { id }) => {
                assert_eq!(id.as_str(), "ghost");
            }
            other => panic!("expected ReferenceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn malformed_directive_is_kept_as_content() {
        let store = MemoryStore::new();
        store.insert_with_id("d", "#include\nrest");
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.resolve(&id("d")).unwrap(), "#include\nrest");
    }

    #[test]
    fn depth_guard_stops_unvalidated_cycles() {
        let store = MemoryStore::new();
        store.insert_with_id("a", "#include b");
        store.insert_with_id("b", "#include a");
        let resolver = Resolver::new(&store);
        assert!(matches!(
            resolver.resolve(&id("a")),
            Err(ResolveError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn form_fields_fill_markers() {
        let store = MemoryStore::new();
        store.insert_with_id("d", "x = ?\ny = ?\n\u{000B}p\t3;4");
        let resolver = Resolver::new(&store);
        let mut fields = FieldQueue::new();
        let text = resolver.resolve_with_queue(&id("d"), &mut fields).unwrap();
        assert_eq!(text, "x = ? {3}\ny = ? {4}");
    }

    #[test]
    fn form_without_markers_leaves_body_unchanged() {
        let store = MemoryStore::new();
        store.insert_with_id("x", "a\nb\n\u{000B}p\tv1;v2");
        let resolver = Resolver::new(&store);
        let mut fields = FieldQueue::new();
        let text = resolver.resolve_with_queue(&id("x"), &mut fields).unwrap();
        assert_eq!(text, "a\nb");
        // The declared fields were adopted but nothing consumed them.
        assert_eq!(fields.value_count(), 2);
    }

    #[test]
    fn caller_values_take_precedence_over_form_defaults() {
        let store = MemoryStore::new();
        store.insert_with_id("d", "x = ? {0}\ny = ? {0}\n\u{000B}p\t10;20");
        let resolver = Resolver::new(&store);
        let mut fields = queue_of(&["7"]);
        let text = resolver.resolve_with_queue(&id("d"), &mut fields).unwrap();
        // One caller value, then the form's second default trickles in.
        assert_eq!(text, "x = ? {7}\ny = ? {20}");
    }

    #[test]
    fn raw_resolution_skips_substitution_everywhere() {
        let store = MemoryStore::new();
        store.insert_with_id("child", "c = ?\n\u{000B}p\t5");
        store.insert_with_id("parent", "#include child");
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.resolve(&id("parent")).unwrap(), "c = ?");
    }

    #[test]
    fn nested_inclusion_uses_child_form_defaults() {
        let store = MemoryStore::new();
        store.insert_with_id("child", "c = ?\n\u{000B}p\t5");
        store.insert_with_id("parent", "#include child\nafter");
        let resolver = Resolver::new(&store);
        let mut fields = FieldQueue::new();
        let text = resolver
            .resolve_with_queue(&id("parent"), &mut fields)
            .unwrap();
        assert_eq!(text, "c = ? {5}\nafter");
    }

    #[test]
    fn inline_values_seed_the_child_queue() {
        let store = MemoryStore::new();
        store.insert_with_id("child", "c = ? {0}\nd = ? {0}\n\u{000B}p\t1;2");
        store.insert_with_id("parent", "#include child #{8;9}");
        let resolver = Resolver::new(&store);
        let mut fields = FieldQueue::new();
        let text = resolver
            .resolve_with_queue(&id("parent"), &mut fields)
            .unwrap();
        assert_eq!(text, "c = ? {8}\nd = ? {9}");
    }

    #[test]
    fn unconsumed_caller_values_remain_for_later_lines() {
        let store = MemoryStore::new();
        store.insert_with_id("child", "c");
        store.insert_with_id("parent", "#include child\nx = ?");
        let resolver = Resolver::new(&store);
        let mut fields = queue_of(&["42"]);
        let text = resolver
            .resolve_with_queue(&id("parent"), &mut fields)
            .unwrap();
        assert_eq!(text, "c\nx = ? {42}");
        assert!(fields.is_empty());
    }

    #[test]
    fn leftover_values_stay_observable_by_the_caller() {
        let store = MemoryStore::new();
        store.insert_with_id("d", "x = ?");
        let resolver = Resolver::new(&store);
        let mut fields = queue_of(&["1", "2", "3"]);
        resolver.resolve_with_queue(&id("d"), &mut fields).unwrap();
        assert_eq!(fields.value_count(), 2);
    }

    #[test]
    fn short_queue_leaves_markers_unexpanded() {
        let store = MemoryStore::new();
        store.insert_with_id("d", "a = ?\nb = ?\nc = ?");
        let resolver = Resolver::new(&store);
        let mut fields = queue_of(&["1"]);
        let text = resolver.resolve_with_queue(&id("d"), &mut fields).unwrap();
        assert_eq!(text, "a = ? {1}\nb = ?\nc = ?");
    }

    #[test]
    fn trailing_blank_after_form_split_is_dropped_once() {
        let store = MemoryStore::new();
        store.insert_with_id("d", "a\nb\n\n\u{000B}p\t1");
        let resolver = Resolver::new(&store);
        // body lines are "a", "b", ""; only the single trailing blank goes
        assert_eq!(resolver.resolve(&id("d")).unwrap(), "a\nb");
    }

    #[test]
    fn blank_lines_without_form_are_preserved() {
        let store = MemoryStore::new();
        store.insert_with_id("d", "a\n\nb");
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.resolve(&id("d")).unwrap(), "a\n\nb");
    }

    #[test]
    fn uid_query_overrides_textual_target() {
        let store = MemoryStore::new();
        store.insert_with_id("3f9a", "addressed");
        store.insert_with_id("parent", "#include \"beam.qd\"?uid=3f9a");
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.resolve(&id("parent")).unwrap(), "addressed");
    }

    #[test]
    fn three_level_chain_expands_depth_first() {
        let store = MemoryStore::new();
        store.insert_with_id("c", "bottom");
        store.insert_with_id("b", "mid-pre\n#include c\nmid-post");
        store.insert_with_id("a", "top\n#include b");
        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver.resolve(&id("a")).unwrap(),
            "top\nmid-pre\nbottom\nmid-post"
        );
    }
}
