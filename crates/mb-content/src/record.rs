//! Content data model.
//!
//! [`ContentRecord`] is one stored document; [`ContentCollection`] is the
//! full repository state, a mapping from normalized route to record.

use std::collections::BTreeMap;

use mb_renderer::{Attributes, ProcessedContent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::route::normalize_route;

/// One stored content entry.
///
/// `rendered` is always derived from `raw` by the markdown processor at
/// storage time; the pair is replaced wholesale on update, never patched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Original markdown text as submitted.
    pub raw: String,
    /// Frontmatter key/value mapping; contains `route` for any record
    /// accepted by the update protocol.
    pub attributes: Attributes,
    /// HTML derived from `raw`.
    pub rendered: String,
}

impl ContentRecord {
    /// The record's declared route, if present as a string attribute.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.attributes.get("route").and_then(Value::as_str)
    }
}

impl From<ProcessedContent> for ContentRecord {
    fn from(processed: ProcessedContent) -> Self {
        Self {
            raw: processed.raw,
            attributes: processed.attributes,
            rendered: processed.rendered,
        }
    }
}

/// The full repository state: normalized route → record.
///
/// Keys are always outputs of [`normalize_route`]; the update protocol is
/// the only writer, so no two records can normalize to the same key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentCollection {
    entries: BTreeMap<String, ContentRecord>,
}

impl ContentCollection {
    /// Look up a record by its normalized key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContentRecord> {
        self.entries.get(key)
    }

    /// Insert or replace the record at `key`.
    pub fn insert(&mut self, key: String, record: ContentRecord) {
        self.entries.insert(key, record);
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the first record whose declared route normalizes to the same
    /// key as `route`.
    ///
    /// Compares each record's `attributes.route` (normalized), not the
    /// storage key, so records survive lookup even if their declared route
    /// was stored under an older normalization.
    #[must_use]
    pub fn find_by_route(&self, route: &str) -> Option<&ContentRecord> {
        let target = normalize_route(route);
        self.entries
            .values()
            .find(|record| record.route().is_some_and(|r| normalize_route(r) == target))
    }

    /// Attributes of every record, in key order.
    #[must_use]
    pub fn meta(&self) -> Vec<Attributes> {
        self.entries
            .values()
            .map(|record| record.attributes.clone())
            .collect()
    }
}
