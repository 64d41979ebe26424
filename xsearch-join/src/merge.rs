//! Merge of a local document set with a foreign one on equal field values.
//!
//! Hash join: the foreign side is bucketed by its join value, then local rows
//! probe the buckets in local order, so the output keeps the local ordering.
//!
//! # Multiplicity
//!
//! A local row whose value matches several foreign documents fans out into
//! one output row per foreign match, in foreign-set order. Every output row
//! counts against the row cap.

use crate::spec::{JoinType, OuterCollector};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use xsearch_index::{DocId, DocSet, FieldValueIndex, ForeignMatch, IndexReader};

/// Inputs of one join merge.
pub struct JoinMerge<'a> {
    pub local_docs: &'a DocSet,
    pub local_index: &'a dyn FieldValueIndex,
    pub foreign_docs: &'a DocSet,
    pub foreign_index: &'a dyn FieldValueIndex,
    /// Maximum number of output rows.
    pub row_cap: usize,
    /// Join position the foreign matches are recorded under.
    pub position: i32,
    pub join_type: JoinType,
    pub outer_collector: Option<&'a dyn OuterCollector>,
    /// Attached to the output for lazy foreign field lookups when
    /// `return_fields` is set.
    pub foreign_reader: Arc<dyn IndexReader>,
    pub return_fields: bool,
    /// Without it, foreign matches carry a score of 0.
    pub return_scores: bool,
}

impl JoinMerge<'_> {
    pub fn run(self) -> DocSet {
        let JoinMerge {
            local_docs,
            local_index,
            foreign_docs,
            foreign_index,
            row_cap,
            position,
            join_type,
            outer_collector,
            foreign_reader,
            return_fields,
            return_scores,
        } = self;

        let mut buckets: FxHashMap<&str, Vec<(DocId, f32)>> = FxHashMap::default();
        for row in foreign_docs {
            if let Some(value) = foreign_index.value(row.doc) {
                let score = if return_scores { row.score } else { 0.0 };
                buckets.entry(value).or_default().push((row.doc, score));
            }
        }

        let mut merged = local_docs.empty_like(row_cap.min(local_docs.len()));
        if return_fields {
            merged.attach_foreign_reader(position, foreign_reader);
        }

        let mut outer_misses = 0usize;
        'rows: for row in local_docs {
            if merged.len() >= row_cap {
                break;
            }
            let value = local_index.value(row.doc);
            match value.and_then(|v| buckets.get(v)) {
                Some(matches) => {
                    for &(doc, score) in matches {
                        if merged.len() >= row_cap {
                            break 'rows;
                        }
                        merged.push(row.with_match(ForeignMatch::hit(position, doc, score)));
                    }
                }
                None if join_type == JoinType::Outer => {
                    if let Some(collector) = outer_collector {
                        collector.collect(row.doc, value.unwrap_or(""));
                    }
                    outer_misses += 1;
                    merged.push(row.with_match(ForeignMatch::miss(position)));
                }
                None => {}
            }
        }

        tracing::trace!(
            position,
            join_type = %join_type,
            local_rows = local_docs.len(),
            foreign_rows = foreign_docs.len(),
            foreign_values = buckets.len(),
            outer_misses,
            merged_rows = merged.len(),
            "join merge done"
        );
        merged
    }
}
