//! Index client and catalog contracts.

use crate::doc::DocSet;
use crate::reader::IndexReader;
use crate::request::{Request, SearchRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

/// Outcome of executing a search request.
///
/// `docs` is the full scored and filtered document set, independent of the
/// request's `start`/`rows` window; `reader` gives access to the field caches
/// of the index that was searched.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub reader: Arc<dyn IndexReader>,
    pub docs: DocSet,
    pub num_found: usize,
}

impl SearchResult {
    pub fn new(reader: Arc<dyn IndexReader>, docs: DocSet) -> Self {
        let num_found = docs.len();
        Self {
            reader,
            docs,
            num_found,
        }
    }
}

/// Handle to one index's query engine.
#[async_trait]
pub trait IndexClient: std::fmt::Debug + Send + Sync {
    /// Index name as registered in the catalog.
    fn name(&self) -> &str;

    /// A fresh field-search request for this index.
    fn new_field_search(&self) -> SearchRequest {
        SearchRequest::field()
    }

    /// A fresh copy of the named request template.
    ///
    /// Returns `None` if no template has that name.
    fn request_template(&self, name: &str) -> Option<Request>;

    /// Execute a search request.
    ///
    /// Timeouts, if any, are the transport's business.
    async fn search(&self, request: &SearchRequest) -> io::Result<SearchResult>;
}

/// Lookup of index clients by name.
pub trait IndexCatalog: Send + Sync {
    /// The client for `name`, or `None` if no such index exists.
    fn client(&self, name: &str) -> Option<Arc<dyn IndexClient>>;
}

impl IndexCatalog for HashMap<String, Arc<dyn IndexClient>> {
    fn client(&self, name: &str) -> Option<Arc<dyn IndexClient>> {
        self.get(name).cloned()
    }
}
