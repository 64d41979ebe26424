//! Shared fixtures for xsearch-join integration tests.
//!
//! Local index `catalog`:
//!
//! | doc | sku | brand |
//! |-----|-----|-------|
//! | 1   | a   | acme  |
//! | 2   | b   | bolt  |
//! | 3   | a   | zeta  |
//!
//! Foreign index `products`: `10 {id: a, title: Anvil, lang: en}`,
//! `11 {id: c, title: Crate, lang: fr}`.
//!
//! Foreign index `brands`: `20 {name: acme, country: us}`.

#![allow(dead_code)]

pub mod span_capture;

use std::sync::{Arc, Mutex};
use xsearch_index::{
    DocId, DocSet, FacetField, Filter, Request, SearchRequest, Timer,
};
use xsearch_join::{JoinFacet, JoinInput, JoinOrchestrator, JoinResult, JoinSpec, OuterCollector, Result};
use xsearch_memory::{MemoryCatalog, MemoryDocument, MemoryIndex, MemoryReader};

pub const PRODUCTS: &str = "products";
pub const BRANDS: &str = "brands";

pub fn local_index() -> MemoryIndex {
    MemoryIndex::new(
        "catalog",
        vec![
            MemoryDocument::new(1).with_field("sku", "a").with_field("brand", "acme"),
            MemoryDocument::new(2).with_field("sku", "b").with_field("brand", "bolt"),
            MemoryDocument::new(3).with_field("sku", "a").with_field("brand", "zeta"),
        ],
    )
}

pub fn products() -> MemoryIndex {
    MemoryIndex::new(
        PRODUCTS,
        vec![
            MemoryDocument::new(10)
                .with_field("id", "a")
                .with_field("title", "Anvil")
                .with_field("lang", "en")
                .with_score(2.5),
            MemoryDocument::new(11)
                .with_field("id", "c")
                .with_field("title", "Crate")
                .with_field("lang", "fr"),
        ],
    )
    .with_template(
        "english",
        Request::Search(
            SearchRequest::pattern("lang:en")
                .with_rows(50)
                .with_filter(Filter::term("title", "Anvil")),
        ),
    )
    .with_template(
        "by-lang",
        Request::Search(SearchRequest::field().with_facet(FacetField::new("lang"))),
    )
    .with_template(
        "spell",
        Request::Spellcheck {
            field: "title".to_string(),
            suggestions: 3,
        },
    )
}

pub fn brands() -> MemoryIndex {
    MemoryIndex::new(
        BRANDS,
        vec![MemoryDocument::new(20)
            .with_field("name", "acme")
            .with_field("country", "us")],
    )
}

pub fn catalog() -> Arc<MemoryCatalog> {
    Arc::new(MemoryCatalog::new().with(products()).with(brands()))
}

/// The primary request whose security context joins forward.
pub fn primary_request() -> SearchRequest {
    SearchRequest::field()
        .with_query_string("*:*")
        .with_users(["alice"])
        .with_groups(["staff"])
}

pub fn local_docs() -> DocSet {
    DocSet::from_docs([1, 2, 3])
}

/// Outer collector recording every call.
pub fn recording_collector() -> (Arc<dyn OuterCollector>, Arc<Mutex<Vec<(DocId, String)>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let collector = move |doc: DocId, value: &str| {
        sink.lock().unwrap().push((doc, value.to_string()));
    };
    (Arc::new(collector), calls)
}

/// Everything one `apply` call needs on the local side.
pub struct Harness {
    pub catalog: Arc<MemoryCatalog>,
    pub orchestrator: JoinOrchestrator,
    pub local: MemoryIndex,
    pub local_reader: Arc<MemoryReader>,
    pub request: SearchRequest,
    pub docs: DocSet,
    pub timer: Timer,
}

impl Harness {
    pub fn new() -> Self {
        let catalog = catalog();
        let local = local_index();
        Self {
            orchestrator: JoinOrchestrator::with_defaults(catalog.clone()),
            catalog,
            local_reader: local.reader(),
            local,
            request: primary_request(),
            docs: local_docs(),
            timer: Timer::new("search"),
        }
    }

    pub fn products(&self) -> Arc<MemoryIndex> {
        self.catalog.get(PRODUCTS).expect("products index")
    }

    /// Run one join over the local documents with the given row cap.
    pub async fn apply(
        &self,
        spec: &mut JoinSpec,
        row_cap: usize,
    ) -> (Result<DocSet>, JoinResult, Vec<JoinFacet>) {
        let mut join_result = JoinResult::new(spec.position());
        let mut facets = Vec::new();
        let input = JoinInput {
            request: &self.request,
            reader: self.local_reader.as_ref(),
            docs: &self.docs,
            row_cap,
        };
        let merged = self
            .orchestrator
            .apply(spec, input, &mut join_result, &mut facets, &self.timer)
            .await;
        (merged, join_result, facets)
    }
}

/// Foreign document ids matched at `position`, one per row.
pub fn foreign_docs(docs: &DocSet, position: i32) -> Vec<Option<DocId>> {
    docs.iter()
        .map(|row| row.foreign(position).and_then(|m| m.doc))
        .collect()
}
