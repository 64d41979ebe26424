//! Distinct-value facet counting.

use crate::doc::DocSet;
use crate::field_index::FieldValueIndex;
use crate::request::FacetField;
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Distinct values of one field over a document set, with counts.
///
/// Sorted by descending count, then ascending value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCounts {
    pub field: String,
    pub counts: Vec<FacetCount>,
}

impl FacetCounts {
    /// No counts; used when the field has no string index.
    pub fn empty(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            counts: Vec::new(),
        }
    }

    /// Count the values of `index` over every row of `docs`, dropping values
    /// seen fewer than `facet.min_count` times.
    pub fn collect(facet: &FacetField, docs: &DocSet, index: &dyn FieldValueIndex) -> Self {
        let mut tally: FxHashMap<u32, usize> = FxHashMap::default();
        for row in docs {
            if let Some(ord) = index.ordinal(row.doc) {
                *tally.entry(ord).or_default() += 1;
            }
        }

        let mut counts: Vec<FacetCount> = tally
            .into_iter()
            .filter(|(_, count)| *count >= facet.min_count)
            .filter_map(|(ord, count)| {
                index.term(ord).map(|value| FacetCount {
                    value: value.to_string(),
                    count,
                })
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

        Self {
            field: facet.field.clone(),
            counts,
        }
    }

    /// Count for one value.
    pub fn get(&self, value: &str) -> Option<usize> {
        self.counts.iter().find(|c| c.value == value).map(|c| c.count)
    }
}
