//! Searchable in-memory index with named request templates.

use crate::document::MemoryDocument;
use crate::query::{matches_filter, matches_query};
use crate::reader::MemoryReader;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use xsearch_index::{DocSet, IndexClient, IndexReader, Request, SearchRequest, SearchResult};

/// Named in-memory index implementing [`IndexClient`].
///
/// A search returns every stored document matching the query string and all
/// filters, in insertion order, regardless of the `start`/`rows` window.
/// The security context (users, groups) is recorded but not enforced.
#[derive(Debug)]
pub struct MemoryIndex {
    name: String,
    reader: Arc<MemoryReader>,
    templates: RwLock<FxHashMap<String, Request>>,
    last_request: Mutex<Option<SearchRequest>>,
    fail_next: Mutex<Option<io::ErrorKind>>,
    searches: AtomicUsize,
}

impl MemoryIndex {
    pub fn new(name: impl Into<String>, docs: Vec<MemoryDocument>) -> Self {
        Self {
            name: name.into(),
            reader: Arc::new(MemoryReader::new(docs)),
            templates: RwLock::new(FxHashMap::default()),
            last_request: Mutex::new(None),
            fail_next: Mutex::new(None),
            searches: AtomicUsize::new(0),
        }
    }

    pub fn with_template(self, name: impl Into<String>, request: Request) -> Self {
        self.add_template(name, request);
        self
    }

    pub fn add_template(&self, name: impl Into<String>, request: Request) {
        self.templates.write().insert(name.into(), request);
    }

    pub fn reader(&self) -> Arc<MemoryReader> {
        Arc::clone(&self.reader)
    }

    /// The request of the most recent search, as received.
    pub fn last_request(&self) -> Option<SearchRequest> {
        self.last_request.lock().clone()
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    /// Make the next search fail with an I/O error of `kind`.
    pub fn fail_next_search(&self, kind: io::ErrorKind) {
        *self.fail_next.lock() = Some(kind);
    }

    fn execute(&self, request: &SearchRequest) -> DocSet {
        DocSet::from_scored(
            self.reader
                .docs()
                .iter()
                .filter(|doc| matches_query(doc, &request.query_string))
                .filter(|doc| request.filters.iter().all(|f| matches_filter(doc, f)))
                .map(|doc| (doc.id, doc.score)),
        )
    }
}

#[async_trait]
impl IndexClient for MemoryIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_template(&self, name: &str) -> Option<Request> {
        self.templates.read().get(name).cloned()
    }

    async fn search(&self, request: &SearchRequest) -> io::Result<SearchResult> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());

        if let Some(kind) = self.fail_next.lock().take() {
            return Err(io::Error::new(
                kind,
                format!("search failed on index {}", self.name),
            ));
        }

        let docs = self.execute(request);
        tracing::trace!(
            index = %self.name,
            query = %request.query_string,
            filters = request.filters.len(),
            found = docs.len(),
            "memory search"
        );
        let reader: Arc<dyn IndexReader> = self.reader.clone();
        Ok(SearchResult::new(reader, docs))
    }
}
