//! Join definitions.

use crate::binding::ForeignQueryBinding;
use crate::error::{JoinError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use xsearch_index::{DocId, FilterSet, IndexCatalog, IndexClient, SearchRequest};

/// Prefix of every join's request parameter key.
pub const PARAM_KEY_PREFIX: &str = "jq";

/// Join semantics for local documents without a foreign match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    /// Drop local documents with no foreign match.
    #[default]
    Inner,
    /// Keep them and report them to the outer collector.
    Outer,
}

impl JoinType {
    const ALL: [JoinType; 2] = [JoinType::Inner, JoinType::Outer];

    /// Case-insensitive lookup. Absent or unknown labels resolve to
    /// [`JoinType::Inner`].
    pub fn find(label: Option<&str>) -> Self {
        label
            .map(str::trim)
            .and_then(|label| {
                Self::ALL
                    .into_iter()
                    .find(|t| t.name().eq_ignore_ascii_case(label))
            })
            .unwrap_or_default()
    }

    /// Upper-case name, as written to configuration.
    pub fn name(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Outer => "OUTER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Outer => "outer",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for JoinType {
    fn from(label: &str) -> Self {
        Self::find(Some(label))
    }
}

/// Receives local documents an outer join kept without a foreign match.
///
/// Called synchronously from the merge, once per unmatched retained row,
/// with the document id and its local join value (empty if it has none).
pub trait OuterCollector: Send + Sync {
    fn collect(&self, doc: DocId, value: &str);
}

impl<F> OuterCollector for F
where
    F: Fn(DocId, &str) + Send + Sync,
{
    fn collect(&self, doc: DocId, value: &str) {
        self(doc, value)
    }
}

/// One join: which foreign index to query and which fields correlate.
///
/// Equality and ordering consider only the index name, query template,
/// query string, local field and foreign field (in that priority order).
///
/// `Clone` deep-copies the filters and leaves the foreign binding and the
/// outer collector behind: a clone resolves its own binding on first use.
pub struct JoinSpec {
    index_name: String,
    query_template: String,
    query_string: String,
    local_field: String,
    foreign_field: String,
    filters: FilterSet,
    join_type: JoinType,
    return_fields: bool,
    return_scores: bool,
    return_facets: bool,
    position: i32,
    param_key: String,
    outer_collector: Option<Arc<dyn OuterCollector>>,
    binding: ForeignQueryBinding,
}

impl Default for JoinSpec {
    fn default() -> Self {
        Self {
            index_name: String::new(),
            query_template: String::new(),
            query_string: String::new(),
            local_field: String::new(),
            foreign_field: String::new(),
            filters: FilterSet::new(),
            join_type: JoinType::Inner,
            return_fields: false,
            return_scores: false,
            return_facets: false,
            position: 0,
            param_key: param_key(0),
            outer_collector: None,
            binding: ForeignQueryBinding::new(),
        }
    }
}

fn param_key(position: i32) -> String {
    format!("{PARAM_KEY_PREFIX}{position}")
}

impl JoinSpec {
    pub fn new(
        index_name: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            ..Self::default()
        }
    }

    pub fn with_query_string(mut self, query: impl Into<String>) -> Self {
        self.query_string = query.into();
        self
    }

    pub fn with_query_template(mut self, template: impl Into<String>) -> Self {
        self.query_template = template.into();
        self
    }

    pub fn with_join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.set_position(position);
        self
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn set_index_name(&mut self, index_name: impl Into<String>) {
        self.index_name = index_name.into();
    }

    pub fn query_template(&self) -> &str {
        &self.query_template
    }

    pub fn set_query_template(&mut self, template: impl Into<String>) {
        self.query_template = template.into();
    }

    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn set_query_string(&mut self, query: impl Into<String>) {
        self.query_string = query.into();
    }

    pub fn local_field(&self) -> &str {
        &self.local_field
    }

    pub fn set_local_field(&mut self, field: impl Into<String>) {
        self.local_field = field.into();
    }

    pub fn foreign_field(&self) -> &str {
        &self.foreign_field
    }

    pub fn set_foreign_field(&mut self, field: impl Into<String>) {
        self.foreign_field = field.into();
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn set_join_type(&mut self, join_type: JoinType) {
        self.join_type = join_type;
    }

    pub fn return_fields(&self) -> bool {
        self.return_fields
    }

    pub fn set_return_fields(&mut self, value: bool) {
        self.return_fields = value;
    }

    pub fn return_scores(&self) -> bool {
        self.return_scores
    }

    pub fn set_return_scores(&mut self, value: bool) {
        self.return_scores = value;
    }

    pub fn return_facets(&self) -> bool {
        self.return_facets
    }

    pub fn set_return_facets(&mut self, value: bool) {
        self.return_facets = value;
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    /// Set the join position; the parameter key follows it.
    pub fn set_position(&mut self, position: i32) {
        self.position = position;
        self.param_key = param_key(position);
    }

    /// Request parameter key carrying this join's query string (`jq<position>`).
    pub fn param_key(&self) -> &str {
        &self.param_key
    }

    pub fn outer_collector(&self) -> Option<&dyn OuterCollector> {
        self.outer_collector.as_deref()
    }

    pub fn set_outer_collector(&mut self, collector: Option<Arc<dyn OuterCollector>>) {
        self.outer_collector = collector;
    }

    /// The lazily resolved foreign client/request pair.
    pub fn binding(&self) -> &ForeignQueryBinding {
        &self.binding
    }

    /// Resolve (once) the foreign client and request for this join.
    pub fn resolve_binding(
        &mut self,
        catalog: &dyn IndexCatalog,
    ) -> Result<(Arc<dyn IndexClient>, &mut SearchRequest)> {
        self.binding
            .resolve(&self.index_name, &self.query_template, catalog)
    }

    /// Check that the required attributes are set.
    pub fn validate(&self) -> Result<()> {
        for (attr, value) in [
            ("indexName", &self.index_name),
            ("localField", &self.local_field),
            ("foreignField", &self.foreign_field),
        ] {
            if value.trim().is_empty() {
                return Err(JoinError::InvalidSpec {
                    message: format!("{attr} is required ({})", self.param_key),
                });
            }
        }
        Ok(())
    }

    fn sort_key(&self) -> (&str, &str, &str, &str, &str) {
        (
            self.index_name.as_str(),
            self.query_template.as_str(),
            self.query_string.as_str(),
            self.local_field.as_str(),
            self.foreign_field.as_str(),
        )
    }
}

impl Clone for JoinSpec {
    fn clone(&self) -> Self {
        Self {
            index_name: self.index_name.clone(),
            query_template: self.query_template.clone(),
            query_string: self.query_string.clone(),
            local_field: self.local_field.clone(),
            foreign_field: self.foreign_field.clone(),
            filters: self.filters.clone(),
            join_type: self.join_type,
            return_fields: self.return_fields,
            return_scores: self.return_scores,
            return_facets: self.return_facets,
            position: self.position,
            param_key: self.param_key.clone(),
            outer_collector: None,
            binding: ForeignQueryBinding::new(),
        }
    }
}

impl PartialEq for JoinSpec {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for JoinSpec {}

impl PartialOrd for JoinSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JoinSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Debug for JoinSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinSpec")
            .field("index_name", &self.index_name)
            .field("query_template", &self.query_template)
            .field("query_string", &self.query_string)
            .field("local_field", &self.local_field)
            .field("foreign_field", &self.foreign_field)
            .field("filters", &self.filters.len())
            .field("join_type", &self.join_type)
            .field("return_fields", &self.return_fields)
            .field("return_scores", &self.return_scores)
            .field("return_facets", &self.return_facets)
            .field("position", &self.position)
            .field("outer_collector", &self.outer_collector.is_some())
            .field("binding", &self.binding)
            .finish()
    }
}
