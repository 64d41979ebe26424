//! Request types understood by index clients.

use crate::error::SyntaxError;
use crate::filter::{Filter, FilterSet};
use crate::params::{parse_param, RequestParams};
use crate::{DEFAULT_FACET_MIN_COUNT, DEFAULT_ROWS};
use serde::{Deserialize, Serialize};

/// How a search request interprets its query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// Query string searched against the index's configured fields.
    #[default]
    Field,
    /// Query string used as a structured query pattern.
    Pattern,
}

/// A field to compute facet counts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetField {
    pub field: String,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

fn default_min_count() -> usize {
    DEFAULT_FACET_MIN_COUNT
}

impl FacetField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            min_count: DEFAULT_FACET_MIN_COUNT,
        }
    }

    pub fn with_min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count;
        self
    }
}

/// A search request.
///
/// `start`/`rows` only select the rendered window; the executed result
/// always carries the complete filtered document set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub kind: SearchKind,

    #[serde(default)]
    pub start: usize,

    #[serde(default = "default_rows")]
    pub rows: usize,

    #[serde(default)]
    pub query_string: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Security context: users the search runs on behalf of.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,

    /// Security context: groups the search runs on behalf of.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    #[serde(default, skip_serializing_if = "FilterSet::is_empty")]
    pub filters: FilterSet,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facet_fields: Vec<FacetField>,
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::field()
    }
}

impl SearchRequest {
    /// Empty field-search request.
    pub fn field() -> Self {
        Self {
            kind: SearchKind::Field,
            start: 0,
            rows: DEFAULT_ROWS,
            query_string: String::new(),
            lang: None,
            users: Vec::new(),
            groups: Vec::new(),
            filters: FilterSet::new(),
            facet_fields: Vec::new(),
        }
    }

    /// Pattern-search request with the given query.
    pub fn pattern(query: impl Into<String>) -> Self {
        Self {
            kind: SearchKind::Pattern,
            query_string: query.into(),
            ..Self::field()
        }
    }

    pub fn with_query_string(mut self, query: impl Into<String>) -> Self {
        self.query_string = query.into();
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_facet(mut self, facet: FacetField) -> Self {
        self.facet_fields.push(facet);
        self
    }

    pub fn with_users(mut self, users: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.users = users.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Whether executing this request computes facets.
    pub fn is_facet(&self) -> bool {
        !self.facet_fields.is_empty()
    }

    /// Override request settings from parameters under `prefix`:
    /// `start`, `rows`, `lang`, and multi-valued `facet`.
    ///
    /// Filters are not read here; whoever owns the filter parameters binds
    /// them into a [`FilterSet`].
    pub fn bind_params(&mut self, params: &dyn RequestParams, prefix: &str) -> Result<(), SyntaxError> {
        if let Some(start) = parse_param(params, &format!("{prefix}start"))? {
            self.start = start;
        }
        if let Some(rows) = parse_param(params, &format!("{prefix}rows"))? {
            self.rows = rows;
        }
        if let Some(lang) = params.param(&format!("{prefix}lang")) {
            self.lang = Some(lang.to_string());
        }
        for field in params.params(&format!("{prefix}facet")) {
            if !self.facet_fields.iter().any(|f| f.field == field) {
                self.facet_fields.push(FacetField::new(field));
            }
        }
        Ok(())
    }
}

/// Any request a client can hold as a named template.
///
/// Only [`Request::Search`] produces a document set; the other kinds exist
/// so template lookup can report a kind mismatch explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Search(SearchRequest),

    /// Fetch stored documents by URI.
    Document { uris: Vec<String> },

    /// Spelling suggestions for a field.
    Spellcheck {
        field: String,
        #[serde(default)]
        suggestions: usize,
    },
}

impl Request {
    /// Short name of the request kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Search(_) => "search",
            Request::Document { .. } => "document",
            Request::Spellcheck { .. } => "spellcheck",
        }
    }
}
