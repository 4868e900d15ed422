//! Plain-data types exchanged with a document store.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Field under which every stored document carries its identity.
pub const ID_FIELD: &str = "_id";

/// A schemaless document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Equality-based structural predicate over top-level document fields.
///
/// An empty filter matches every document. A `null` condition matches
/// documents where the field is null or missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: BTreeMap<String, Value>,
}

impl Filter {
    /// Matches every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the document with the given identity.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::eq(ID_FIELD, Value::String(id.into()))
    }

    /// Matches documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    /// Adds another equality condition. A repeated field replaces the earlier value.
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Evaluates the filter against a document that carries its `_id`.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| match document.get(field) {
                Some(actual) => actual == expected,
                None => expected.is_null(),
            })
    }
}

/// Merges `set` into `document`, replacing top-level fields.
///
/// The identity field is never overwritten.
pub fn apply_set(document: &mut Document, set: Document) {
    for (field, value) in set {
        if field == ID_FIELD {
            continue;
        }
        document.insert(field, value);
    }
}

/// Normalizes a caller-supplied pagination window.
///
/// Negative `skip` is treated as zero and a non-positive `limit` means
/// "no limit", mirroring document-database cursor semantics.
pub fn normalize_window(skip: i64, limit: i64) -> (u64, Option<u64>) {
    let skip = u64::try_from(skip).unwrap_or(0);
    let limit = u64::try_from(limit).ok().filter(|l| *l > 0);
    (skip, limit)
}
