//! The macro substitution pass: positional input-field markers.
//!
//! A `?` in body text marks an input field. The marker may carry its
//! current value in a brace pair right after it (`? {20}`); substitution
//! replaces the brace content with the next queued value, or attaches a
//! fresh `{value}` to a bare marker. The marker itself survives, so an
//! expanded document remains a fillable input form.
//!
//! Markers inside `"…"` and `'…'` spans (string literals and comments of
//! the calculation language) are never touched. An exhausted queue is not
//! an error: remaining markers stay literally in the text for later
//! passes.

use crate::field::FieldQueue;

/// Character marking an input field in body text.
pub const MARKER: char = '?';

/// Split a line into plain and quoted segments.
///
/// A segment starting with `'` or `"` runs to the matching closing
/// character (inclusive). Quoted spans never cross a line break; an
/// unterminated quote ends at the next newline or at the end of input.
struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    fn new(text: &'a str) -> Self {
        Segments { rest: text }
    }
}

impl<'a> Iterator for Segments<'a> {
    /// `(text, quoted)` — quoted segments are exempt from scanning.
    type Item = (&'a str, bool);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let first = self.rest.as_bytes()[0];
        if first == b'\'' || first == b'"' {
            let tail = &self.rest[1..];
            let close = tail.find(first as char).map(|i| i + 2);
            let newline = tail.find('\n').map(|i| i + 1);
            let end = match (close, newline) {
                (Some(c), Some(n)) if n < c => n,
                (Some(c), _) => c,
                (None, Some(n)) => n,
                (None, None) => self.rest.len(),
            };
            let (segment, rest) = self.rest.split_at(end);
            self.rest = rest;
            Some((segment, true))
        } else {
            let end = self.rest.find(['\'', '"']).unwrap_or(self.rest.len());
            let (segment, rest) = self.rest.split_at(end);
            self.rest = rest;
            Some((segment, false))
        }
    }
}

/// Count input-field markers outside quoted segments.
pub fn count_markers(text: &str) -> usize {
    Segments::new(text)
        .filter(|(_, quoted)| !quoted)
        .map(|(segment, _)| segment.matches(MARKER).count())
        .sum()
}

/// True when the text carries at least one marker outside quoted segments.
pub fn has_markers(text: &str) -> bool {
    Segments::new(text).any(|(segment, quoted)| !quoted && segment.contains(MARKER))
}

/// Scanner state while walking one plain segment.
#[derive(PartialEq, Eq, Clone, Copy)]
enum State {
    Plain,
    /// A `?` is pending; spaces may separate it from its brace pair.
    Marker,
    /// Inside the `{…}` pair that follows a marker.
    Brace,
}

/// Fill input-field markers in one line from the front of the queue.
///
/// Returns the rebuilt line when at least one value was spliced in, or
/// `None` when nothing changed, so callers can keep the original string.
/// Exhausting the queue mid-line keeps the replacements already made and
/// leaves the remaining markers untouched.
pub fn substitute_line(line: &str, fields: &mut FieldQueue) -> Option<String> {
    if line.is_empty() || fields.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(line.len() + 16);
    let mut replaced = false;
    for (segment, quoted) in Segments::new(line) {
        if quoted || !segment.contains(MARKER) {
            out.push_str(segment);
        } else {
            replaced |= substitute_segment(segment, fields, &mut out);
        }
    }
    if replaced {
        Some(out)
    } else {
        None
    }
}

fn substitute_segment(segment: &str, fields: &mut FieldQueue, out: &mut String) -> bool {
    let mut replaced = false;
    let mut state = State::Plain;
    // Start of the text not yet copied to `out`.
    let mut chunk = 0;

    for (i, c) in segment.char_indices() {
        match c {
            MARKER if state != State::Brace => state = State::Marker,
            '{' if state == State::Marker => {
                out.push_str(&segment[chunk..=i]);
                chunk = i + 1;
                state = State::Brace;
            }
            '}' if state == State::Brace => {
                state = State::Plain;
                if let Some(value) = fields.pop_value() {
                    out.push_str(&value);
                    replaced = true;
                    // The prior brace content is dropped; the closing
                    // brace starts the next chunk.
                    chunk = i;
                }
                // Queue dry: chunk still covers the old content, so it is
                // copied verbatim later and the marker stays unexpanded.
            }
            _ if state == State::Brace => {}
            c if c != ' ' && state == State::Marker => {
                state = State::Plain;
                if let Some(value) = fields.pop_value() {
                    out.push_str(&segment[chunk..i]);
                    out.push('{');
                    out.push_str(&value);
                    out.push('}');
                    replaced = true;
                    chunk = i;
                }
            }
            _ => {}
        }
    }

    // A marker still pending at segment end gains its value pair here.
    if state == State::Marker {
        if let Some(value) = fields.pop_value() {
            out.push_str(&segment[chunk..]);
            out.push_str(" {");
            out.push_str(&value);
            out.push('}');
            replaced = true;
            chunk = segment.len();
        }
    }
    out.push_str(&segment[chunk..]);
    replaced
}
