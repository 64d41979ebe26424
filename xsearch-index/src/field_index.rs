//! Per-document string value lookups (field caches).

use crate::doc::DocId;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Ordinal-to-string value lookup for one field of one index.
///
/// Each document maps to at most one ordinal; ordinals index a sorted
/// dictionary of the field's distinct values. Join keys on both the local
/// and the foreign side are read through this interface.
pub trait FieldValueIndex: Send + Sync {
    /// Ordinal of the document's value, or `None` if it has no value.
    fn ordinal(&self, doc: DocId) -> Option<u32>;

    /// Value for an ordinal.
    fn term(&self, ordinal: u32) -> Option<&str>;

    /// Number of distinct values.
    fn num_terms(&self) -> usize;

    /// The document's value.
    fn value(&self, doc: DocId) -> Option<&str> {
        self.ordinal(doc).and_then(|ord| self.term(ord))
    }
}

/// In-memory [`FieldValueIndex`] built from `(doc, value)` pairs.
#[derive(Debug, Clone, Default)]
pub struct StringIndex {
    /// Distinct values, sorted.
    terms: Vec<Arc<str>>,
    ordinals: FxHashMap<DocId, u32>,
}

impl StringIndex {
    /// Build from `(doc, value)` pairs. When a document appears more than
    /// once, the last value wins.
    pub fn from_values<'a>(values: impl IntoIterator<Item = (DocId, &'a str)>) -> Self {
        let values: Vec<(DocId, &str)> = values.into_iter().collect();

        let mut terms: Vec<&str> = values.iter().map(|(_, v)| *v).collect();
        terms.sort_unstable();
        terms.dedup();

        let mut ordinals = FxHashMap::default();
        ordinals.reserve(values.len());
        for (doc, value) in &values {
            if let Ok(ord) = terms.binary_search(value) {
                ordinals.insert(*doc, ord as u32);
            }
        }

        Self {
            terms: terms.into_iter().map(Arc::from).collect(),
            ordinals,
        }
    }

    /// Number of documents with a value.
    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }
}

impl FieldValueIndex for StringIndex {
    fn ordinal(&self, doc: DocId) -> Option<u32> {
        self.ordinals.get(&doc).copied()
    }

    fn term(&self, ordinal: u32) -> Option<&str> {
        self.terms.get(ordinal as usize).map(|t| &**t)
    }

    fn num_terms(&self) -> usize {
        self.terms.len()
    }
}
