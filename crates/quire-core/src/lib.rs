//! Core data model and text passes for the quire document engine.
//!
//! A quire document is plain text: a body of lines, optionally followed by
//! a form section that declares substitution fields. The body may contain
//! inclusion directives that splice in other documents, scope directives
//! that hide regions from including parents, and positional input-field
//! markers filled from a field queue during expansion.
//!
//! This crate holds the leaf pieces the resolver is built from:
//! - [`document`] — document identity and the body/form split
//! - [`field`] — fields and the front-to-back consumed [`FieldQueue`]
//! - [`scan`] — line classification into directives and content
//! - [`subst`] — the per-line input-field substitution pass

pub mod document;
pub mod field;
pub mod scan;
pub mod subst;

// Re-exports for convenience.
pub use document::{Document, DocumentId, FIELD_SEPARATOR, FORM_SEPARATOR, VALUE_SEPARATOR};
pub use field::{Field, FieldQueue};
pub use scan::{classify, is_keyword, IncludeDirective, LineKind};
pub use subst::{count_markers, has_markers, substitute_line};
