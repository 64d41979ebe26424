//! Field caches over memory documents.

use crate::document::MemoryDocument;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::io;
use std::sync::Arc;
use xsearch_index::{FieldValueIndex, IndexReader, StringIndex};

/// Field caches over a fixed set of memory documents.
///
/// String indexes are built on first request and cached per field. A field
/// no document carries has no index.
#[derive(Debug)]
pub struct MemoryReader {
    docs: Vec<MemoryDocument>,
    cache: RwLock<FxHashMap<String, Option<Arc<StringIndex>>>>,
    broken_fields: RwLock<FxHashSet<String>>,
}

impl MemoryReader {
    pub fn new(docs: Vec<MemoryDocument>) -> Self {
        Self {
            docs,
            cache: RwLock::new(FxHashMap::default()),
            broken_fields: RwLock::new(FxHashSet::default()),
        }
    }

    pub fn docs(&self) -> &[MemoryDocument] {
        &self.docs
    }

    /// Make every later `string_index(field)` call fail with an I/O error.
    pub fn break_field(&self, field: impl Into<String>) {
        self.broken_fields.write().insert(field.into());
    }

    /// Number of field indexes built so far.
    pub fn cached_fields(&self) -> usize {
        self.cache.read().len()
    }

    fn build(&self, field: &str) -> Option<Arc<StringIndex>> {
        let index = StringIndex::from_values(
            self.docs
                .iter()
                .filter_map(|doc| doc.field(field).map(|value| (doc.id, value))),
        );
        if index.is_empty() {
            return None;
        }
        tracing::trace!(field, docs = index.len(), terms = index.num_terms(), "string index built");
        Some(Arc::new(index))
    }
}

impl IndexReader for MemoryReader {
    fn string_index(&self, field: &str) -> io::Result<Option<Arc<dyn FieldValueIndex>>> {
        if self.broken_fields.read().contains(field) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("field cache unavailable: {field}"),
            ));
        }

        if let Some(cached) = self.cache.read().get(field) {
            return Ok(cached.clone().map(|index| index as Arc<dyn FieldValueIndex>));
        }

        let built = self.build(field);
        let index = self
            .cache
            .write()
            .entry(field.to_string())
            .or_insert(built)
            .clone();
        Ok(index.map(|index| index as Arc<dyn FieldValueIndex>))
    }

    fn num_docs(&self) -> usize {
        self.docs.len()
    }
}
