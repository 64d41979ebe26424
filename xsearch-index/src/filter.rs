//! Search filters.

use crate::error::SyntaxError;
use crate::params::RequestParams;
use serde::{Deserialize, Serialize};

/// Parameter suffix for positive filter queries.
pub const PARAM_FILTER: &str = "fq";

/// Parameter suffix for negative filter queries.
pub const PARAM_NEGATIVE_FILTER: &str = "fqn";

/// A filter restricting the documents a search may return.
///
/// Filters never contribute to scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Documents must (or, if negative, must not) match a query.
    Query {
        query: String,
        #[serde(default)]
        negative: bool,
    },

    /// Documents must (or must not) have exactly `value` in `field`.
    Term {
        field: String,
        value: String,
        #[serde(default)]
        negative: bool,
    },
}

impl Filter {
    pub fn query(query: impl Into<String>) -> Self {
        Filter::Query {
            query: query.into(),
            negative: false,
        }
    }

    pub fn negative_query(query: impl Into<String>) -> Self {
        Filter::Query {
            query: query.into(),
            negative: true,
        }
    }

    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Term {
            field: field.into(),
            value: value.into(),
            negative: false,
        }
    }

    /// Parse a query filter received as a request parameter.
    pub fn parse_query(key: &str, query: &str, negative: bool) -> Result<Self, SyntaxError> {
        check_query_syntax(key, query)?;
        Ok(Filter::Query {
            query: query.trim().to_string(),
            negative,
        })
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Filter::Query { negative, .. } | Filter::Term { negative, .. } => *negative,
        }
    }
}

/// Reject blank queries, unterminated quotes and unbalanced parentheses.
fn check_query_syntax(key: &str, query: &str) -> Result<(), SyntaxError> {
    if query.trim().is_empty() {
        return Err(SyntaxError::EmptyFilter {
            key: key.to_string(),
        });
    }

    let mut depth = 0usize;
    let mut in_quotes = false;
    for c in query.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| SyntaxError::UnbalancedParentheses {
                        query: query.to_string(),
                    })?;
            }
            _ => {}
        }
    }

    if in_quotes {
        return Err(SyntaxError::UnterminatedQuote {
            query: query.to_string(),
        });
    }
    if depth != 0 {
        return Err(SyntaxError::UnbalancedParentheses {
            query: query.to_string(),
        });
    }
    Ok(())
}

/// Ordered collection of filters attached to a request or a join.
///
/// `Clone` is a deep copy: two clones never share filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Append copies of every filter in `other`, keeping existing ones.
    pub fn extend_from(&mut self, other: &FilterSet) {
        self.filters.extend(other.filters.iter().cloned());
    }

    pub fn remove(&mut self, idx: usize) -> Option<Filter> {
        (idx < self.filters.len()).then(|| self.filters.remove(idx))
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    /// Add the filters carried by request parameters under `prefix`:
    /// every `<prefix>fq` value as a positive query filter and every
    /// `<prefix>fqn` value as a negative one.
    pub fn bind_params(&mut self, params: &dyn RequestParams, prefix: &str) -> Result<(), SyntaxError> {
        for (suffix, negative) in [(PARAM_FILTER, false), (PARAM_NEGATIVE_FILTER, true)] {
            let key = format!("{prefix}{suffix}");
            for query in params.params(&key) {
                self.push(Filter::parse_query(&key, query, negative)?);
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<T: IntoIterator<Item = Filter>>(iter: T) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}
