//! Name-keyed catalog of memory indexes.

use crate::index::MemoryIndex;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use xsearch_index::{IndexCatalog, IndexClient};

/// Name → [`MemoryIndex`] map implementing [`IndexCatalog`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    indexes: FxHashMap<String, Arc<MemoryIndex>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an index under its own name, replacing any previous one.
    pub fn insert(&mut self, index: Arc<MemoryIndex>) {
        self.indexes.insert(index.name().to_string(), index);
    }

    pub fn with(mut self, index: MemoryIndex) -> Self {
        self.insert(Arc::new(index));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<MemoryIndex>> {
        self.indexes.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

impl IndexCatalog for MemoryCatalog {
    fn client(&self, name: &str) -> Option<Arc<dyn IndexClient>> {
        self.indexes
            .get(name)
            .map(|index| Arc::clone(index) as Arc<dyn IndexClient>)
    }
}
