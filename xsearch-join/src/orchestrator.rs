//! Join execution.
//!
//! [`JoinOrchestrator::apply`] runs one join end to end:
//!
//! 1. resolve the local field-value index
//! 2. resolve the foreign client and request (memoized on the spec)
//! 3. configure the foreign request (window, security context, query, filters)
//! 4. execute the foreign search under a `join N foreign search` timer
//! 5. record the result and capture facets
//! 6. resolve the foreign field-value index
//! 7. merge under a `join N join` timer
//!
//! [`JoinOrchestrator::apply_all`] chains every join of a [`JoinList`], each
//! join consuming the previous join's output.

use crate::config::JoinConfig;
use crate::error::{JoinError, Result};
use crate::list::JoinList;
use crate::merge::JoinMerge;
use crate::result::{JoinFacet, JoinResult};
use crate::spec::JoinSpec;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use xsearch_index::{DocSet, IndexCatalog, IndexReader, RequestParams, SearchRequest, Timer};

/// Local side of a join.
#[derive(Debug, Clone, Copy)]
pub struct JoinInput<'a> {
    /// The primary search request; its users and groups are forwarded.
    pub request: &'a SearchRequest,
    /// Reader of the local index.
    pub reader: &'a dyn IndexReader,
    /// Local candidate documents, in result order.
    pub docs: &'a DocSet,
    /// Maximum number of merged rows.
    pub row_cap: usize,
}

/// Output of [`JoinOrchestrator::apply_all`].
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Local documents after the last join.
    pub docs: DocSet,
    /// One entry per join, in position order.
    pub results: Vec<JoinResult>,
    /// Facets captured from joins with `returnFacets` set.
    pub facets: Vec<JoinFacet>,
}

/// Runs joins against foreign indexes found in a catalog.
pub struct JoinOrchestrator {
    catalog: Arc<dyn IndexCatalog>,
    config: JoinConfig,
}

impl JoinOrchestrator {
    pub fn new(catalog: Arc<dyn IndexCatalog>, config: JoinConfig) -> Self {
        Self { catalog, config }
    }

    pub fn with_defaults(catalog: Arc<dyn IndexCatalog>) -> Self {
        Self::new(catalog, JoinConfig::default())
    }

    pub fn config(&self) -> &JoinConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<dyn IndexCatalog> {
        &self.catalog
    }

    /// Bind every join of `joins` from request parameters, using the
    /// configured parameter prefix.
    pub fn bind_from_request(&self, joins: &mut JoinList, params: &dyn RequestParams) -> Result<()> {
        for spec in joins.iter_mut() {
            spec.bind_from_request(params, &self.config.param_prefix, self.catalog.as_ref())?;
        }
        Ok(())
    }

    /// Run one join and return the merged local document set.
    ///
    /// Fills `join_result` with the foreign search outcome and may push one
    /// entry onto `join_facets`. Any failure aborts the join; timer scopes
    /// opened so far are closed.
    pub async fn apply(
        &self,
        spec: &mut JoinSpec,
        input: JoinInput<'_>,
        join_result: &mut JoinResult,
        join_facets: &mut Vec<JoinFacet>,
        timer: &Timer,
    ) -> Result<DocSet> {
        spec.validate()?;
        let position = spec.position();

        let local_index = input
            .reader
            .string_index(spec.local_field())?
            .ok_or_else(|| JoinError::MissingLocalFieldIndex {
                field: spec.local_field().to_string(),
            })?;

        let query_string = spec.query_string().to_string();
        let filters = spec.filters().clone();
        let return_facets = spec.return_facets();

        let (client, foreign_request) = spec.resolve_binding(self.catalog.as_ref())?;
        foreign_request.start = 0;
        foreign_request.rows = 0;
        foreign_request.users = input.request.users.clone();
        foreign_request.groups = input.request.groups.clone();
        foreign_request.query_string = query_string;
        foreign_request.filters.extend_from(&filters);

        let scope = timer.scope(format!("join {position} foreign search"));
        let span = tracing::debug_span!(
            "join_foreign_search",
            position,
            index = %client.name(),
            filters = foreign_request.filters.len(),
            found = tracing::field::Empty,
            ms = tracing::field::Empty
        );
        let started = Instant::now();
        let searched = client
            .search(foreign_request)
            .instrument(span.clone())
            .await;
        span.record("ms", (started.elapsed().as_secs_f64() * 1000.0) as u64);
        let foreign_result = Arc::new(searched?);
        span.record("found", foreign_result.num_found as u64);
        scope.finish();

        join_result.set_foreign_result(Arc::clone(&foreign_result));

        if foreign_request.is_facet() {
            if return_facets {
                join_facets.push(JoinFacet::new(
                    position,
                    foreign_request.facet_fields.clone(),
                    Arc::clone(&foreign_result),
                ));
            }
            foreign_request.facet_fields.clear();
        }

        let foreign_index = foreign_result
            .reader
            .string_index(spec.foreign_field())?
            .ok_or_else(|| JoinError::MissingForeignFieldIndex {
                field: spec.foreign_field().to_string(),
            })?;

        let _scope = timer.scope(format!("join {position} join"));
        let span = tracing::debug_span!(
            "join_merge",
            position,
            join_type = %spec.join_type(),
            local_rows = input.docs.len(),
            rows = tracing::field::Empty,
            ms = tracing::field::Empty
        );
        let started = Instant::now();
        let merged = span.in_scope(|| {
            JoinMerge {
                local_docs: input.docs,
                local_index: local_index.as_ref(),
                foreign_docs: &foreign_result.docs,
                foreign_index: foreign_index.as_ref(),
                row_cap: input.row_cap,
                position,
                join_type: spec.join_type(),
                outer_collector: spec.outer_collector(),
                foreign_reader: Arc::clone(&foreign_result.reader),
                return_fields: spec.return_fields(),
                return_scores: spec.return_scores(),
            }
            .run()
        });
        span.record("rows", merged.len() as u64);
        span.record("ms", (started.elapsed().as_secs_f64() * 1000.0) as u64);

        tracing::debug!(
            position,
            index = %spec.index_name(),
            foreign_found = foreign_result.num_found,
            rows = merged.len(),
            "join applied"
        );
        Ok(merged)
    }

    /// Apply every join of `joins` in position order.
    ///
    /// The first join consumes `docs`; each later join consumes the previous
    /// join's output. Every merge is capped at `max_join_rows`.
    pub async fn apply_all(
        &self,
        joins: &mut JoinList,
        request: &SearchRequest,
        reader: &dyn IndexReader,
        docs: DocSet,
        timer: &Timer,
    ) -> Result<JoinOutcome> {
        let mut docs = docs;
        let mut results = Vec::with_capacity(joins.len());
        let mut facets = Vec::new();

        for spec in joins.iter_mut() {
            let mut join_result = JoinResult::new(spec.position());
            let input = JoinInput {
                request,
                reader,
                docs: &docs,
                row_cap: self.config.max_join_rows,
            };
            docs = self
                .apply(spec, input, &mut join_result, &mut facets, timer)
                .await?;
            results.push(join_result);
        }

        if self.config.log_timings {
            tracing::debug!(joins = results.len(), timers = %timer.report(), "join timings");
        }

        Ok(JoinOutcome {
            docs,
            results,
            facets,
        })
    }
}

impl fmt::Debug for JoinOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinOrchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
