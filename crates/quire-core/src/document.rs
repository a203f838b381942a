//! Document identity and raw-text layout.
//!
//! Documents are addressed by opaque string identifiers: content or
//! storage addresses, never filesystem paths in the general case. The raw
//! text of a document is a body followed by an optional form section,
//! separated by a single reserved control character.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Control character dividing a document's body from its trailing form section.
pub const FORM_SEPARATOR: char = '\u{000B}';

/// Character separating a field's name from its value list within one form line.
pub const FIELD_SEPARATOR: char = '\t';

/// Character separating individual values within a value list.
pub const VALUE_SEPARATOR: char = ';';

/// An opaque document identifier.
///
/// Identifiers are compared byte-for-byte. [`DocumentId::from_content`]
/// derives a content address; any other string is accepted as a storage
/// address chosen by the owning store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    /// Derive a content-addressed identifier: the SHA-256 hex digest of the text.
    pub fn from_content(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        DocumentId(hex_encode(&hasher.finalize()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        DocumentId(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        DocumentId(id)
    }
}

/// Encode bytes as lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A document as the engine sees it: identifier plus raw text.
///
/// The engine never mutates a document; stores create and update them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Identifier under which the text is stored.
    pub id: DocumentId,
    /// Raw text: body, optionally followed by the form separator and a form section.
    pub text: String,
}

impl Document {
    /// Create a document from an identifier and raw text.
    pub fn new(id: impl Into<DocumentId>, text: impl Into<String>) -> Self {
        Document {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Create a content-addressed document: the identifier is derived from the text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Document {
            id: DocumentId::from_content(&text),
            text,
        }
    }

    /// Split raw text into body and form at the first form separator.
    ///
    /// The form exists only when the separator appears past the start of
    /// the text; a leading separator leaves the text as one body.
    pub fn split_form(text: &str) -> (&str, Option<&str>) {
        match text.find(FORM_SEPARATOR) {
            Some(n) if n > 0 => (&text[..n], Some(&text[n + FORM_SEPARATOR.len_utf8()..])),
            _ => (text, None),
        }
    }

    /// The body portion of this document's text.
    pub fn body(&self) -> &str {
        Document::split_form(&self.text).0
    }

    /// The form portion of this document's text, if any.
    pub fn form(&self) -> Option<&str> {
        Document::split_form(&self.text).1
    }
}
