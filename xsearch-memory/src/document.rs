//! Stored documents.

use std::collections::BTreeMap;
use xsearch_index::DocId;

/// A stored document: an id, a score, and single-valued string fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    pub id: DocId,
    /// Score reported for the document whenever a search returns it.
    pub score: f32,
    fields: BTreeMap<String, String>,
}

impl MemoryDocument {
    pub fn new(id: DocId) -> Self {
        Self {
            id,
            score: 1.0,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
