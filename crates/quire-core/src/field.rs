//! Substitution fields and the queue consumed during expansion.
//!
//! A field is a named (or purely positional) ordered list of string
//! values. A [`FieldQueue`] holds fields in declaration order and is
//! consumed strictly front to back: the substitution pass pops values from
//! the front field and discards it once exhausted, so no value is ever
//! consumed twice within one pass.

use std::collections::VecDeque;

use crate::document::{FIELD_SEPARATOR, VALUE_SEPARATOR};

/// A named or positional ordered list of substitution values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    name: String,
    values: Vec<String>,
}

impl Field {
    /// Create a named field.
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Field {
            name: name.into(),
            values,
        }
    }

    /// Create a purely positional field (empty name).
    pub fn positional(values: Vec<String>) -> Self {
        Field {
            name: String::new(),
            values,
        }
    }

    /// The field name; empty for positional fields.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The remaining values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of remaining values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no values remain.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge an incoming value set into this field.
    ///
    /// The value count never shrinks: an empty field adopts the incoming
    /// set wholesale, a longer incoming set grows the field to its length,
    /// and a shorter one overwrites only the leading slots, leaving the
    /// remainder at their prior values. Length mismatch is never an error.
    pub fn merge_values(&mut self, incoming: &[String]) {
        if self.values.is_empty() {
            self.values = incoming.to_vec();
            return;
        }
        if incoming.len() > self.values.len() {
            self.values.resize(incoming.len(), String::new());
        }
        for (slot, value) in self.values.iter_mut().zip(incoming) {
            slot.clone_from(value);
        }
    }
}

/// An ordered queue of fields, consumed strictly front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldQueue {
    fields: VecDeque<Field>,
}

impl FieldQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        FieldQueue::default()
    }

    /// Parse a form section into a queue.
    ///
    /// The form is line-oriented: each non-blank line declares one field
    /// as `name<TAB>value;value;…`. A line without the field separator
    /// declares a nameless positional field holding the whole value list.
    /// A blank form yields an empty queue.
    pub fn from_form(form: &str) -> Self {
        let mut queue = FieldQueue::new();
        for line in form.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let field = match line.find(FIELD_SEPARATOR) {
                Some(n) => Field::new(line[..n].trim(), split_values(&line[n + 1..])),
                None => Field::positional(split_values(line)),
            };
            queue.push_back(field);
        }
        queue
    }

    /// Append a field at the back of the queue.
    pub fn push_back(&mut self, field: Field) {
        self.fields.push_back(field);
    }

    /// Number of fields still in the queue.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Total values remaining across all fields.
    pub fn value_count(&self) -> usize {
        self.fields.iter().map(Field::len).sum()
    }

    /// True when no values remain to be consumed.
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(Field::is_empty)
    }

    /// Iterate over the remaining fields, front to back.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Pop the next value from the front field.
    ///
    /// A field whose values are exhausted is discarded from the queue and
    /// never reused within the pass. Returns `None` once the queue is dry.
    pub fn pop_value(&mut self) -> Option<String> {
        loop {
            let front = self.fields.front_mut()?;
            if front.values.is_empty() {
                self.fields.pop_front();
                continue;
            }
            let value = front.values.remove(0);
            if front.values.is_empty() {
                self.fields.pop_front();
            }
            return Some(value);
        }
    }

    /// Reconcile this caller queue with the fields a callee declares.
    ///
    /// An empty caller queue adopts the declared fields wholesale. A
    /// caller holding fewer values than the callee declares gains the
    /// declared values beyond its own count, appended as whole or partial
    /// trailing fields so they stay available further down the inclusion
    /// chain. A caller holding at least as many values is left unchanged.
    pub fn reconcile(&mut self, declared: FieldQueue) {
        let held = self.value_count();
        if held == 0 {
            self.fields = declared.fields;
            return;
        }
        let mut skip = held;
        for mut field in declared.fields {
            if skip >= field.values.len() {
                skip -= field.values.len();
                continue;
            }
            field.values.drain(..skip);
            skip = 0;
            self.fields.push_back(field);
        }
    }
}

impl FromIterator<Field> for FieldQueue {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        FieldQueue {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Split a `;`-joined value list, trimming each value.
fn split_values(s: &str) -> Vec<String> {
    s.split(VALUE_SEPARATOR)
        .map(|v| v.trim().to_string())
        .collect()
}
