//! Per-join result holders filled by [`JoinOrchestrator::apply`].
//!
//! [`JoinOrchestrator::apply`]: crate::JoinOrchestrator::apply

use crate::error::Result;
use std::sync::Arc;
use xsearch_index::{FacetCounts, FacetField, SearchResult};

/// Foreign search outcome of one join, kept for rendering.
#[derive(Debug, Clone)]
pub struct JoinResult {
    position: i32,
    foreign_result: Option<Arc<SearchResult>>,
}

impl JoinResult {
    pub fn new(position: i32) -> Self {
        Self {
            position,
            foreign_result: None,
        }
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn set_foreign_result(&mut self, result: Arc<SearchResult>) {
        self.foreign_result = Some(result);
    }

    pub fn foreign_result(&self) -> Option<&Arc<SearchResult>> {
        self.foreign_result.as_ref()
    }

    /// Number of foreign documents the foreign search found (0 before apply).
    pub fn foreign_num_found(&self) -> usize {
        self.foreign_result.as_ref().map_or(0, |r| r.num_found)
    }
}

/// Facet request captured from a join's foreign search.
///
/// Counts are computed on demand over the foreign document set.
#[derive(Debug, Clone)]
pub struct JoinFacet {
    position: i32,
    fields: Vec<FacetField>,
    result: Arc<SearchResult>,
}

impl JoinFacet {
    pub fn new(position: i32, fields: Vec<FacetField>, result: Arc<SearchResult>) -> Self {
        Self {
            position,
            fields,
            result,
        }
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn fields(&self) -> &[FacetField] {
        &self.fields
    }

    pub fn result(&self) -> &Arc<SearchResult> {
        &self.result
    }

    /// Facet counts for every captured field, in field order.
    ///
    /// A field without a string index on the foreign side yields no counts.
    pub fn counts(&self) -> Result<Vec<FacetCounts>> {
        let mut out = Vec::with_capacity(self.fields.len());
        for facet in &self.fields {
            match self.result.reader.string_index(&facet.field)? {
                Some(index) => out.push(FacetCounts::collect(facet, &self.result.docs, index.as_ref())),
                None => {
                    tracing::warn!(
                        position = self.position,
                        field = %facet.field,
                        "foreign facet field has no string index"
                    );
                    out.push(FacetCounts::empty(&facet.field));
                }
            }
        }
        Ok(out)
    }
}
