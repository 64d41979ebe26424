//! Query matching over memory documents.
//!
//! A query is whitespace-separated clauses that must all match:
//!
//! - `*:*` matches every document (so does an empty query)
//! - `field:value` matches documents whose `field` equals `value`
//! - a bare `term` matches documents with any field equal to `term`
//!
//! Surrounding parentheses and double quotes are stripped from clauses and
//! an upper-case `AND` is ignored, so queries accepted by the filter syntax
//! check also run here.

use crate::document::MemoryDocument;
use xsearch_index::Filter;

pub fn matches_query(doc: &MemoryDocument, query: &str) -> bool {
    query
        .split_whitespace()
        .map(|clause| clause.trim_matches(|c| c == '(' || c == ')'))
        .filter(|clause| !clause.is_empty() && *clause != "AND")
        .all(|clause| matches_clause(doc, clause))
}

fn matches_clause(doc: &MemoryDocument, clause: &str) -> bool {
    if clause == "*:*" {
        return true;
    }
    match clause.split_once(':') {
        Some((field, value)) => doc.field(field) == Some(unquote(value)),
        None => {
            let term = unquote(clause);
            doc.fields().any(|(_, value)| value == term)
        }
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

/// Whether `doc` passes `filter`; negative filters exclude their matches.
pub fn matches_filter(doc: &MemoryDocument, filter: &Filter) -> bool {
    let (matched, negative) = match filter {
        Filter::Query { query, negative } => (matches_query(doc, query), *negative),
        Filter::Term {
            field,
            value,
            negative,
        } => (doc.field(field) == Some(value.as_str()), *negative),
    };
    matched != negative
}
