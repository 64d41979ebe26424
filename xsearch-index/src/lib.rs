//! Index-side contracts for the xsearch join pipeline.
//!
//! The join component never talks to a concrete search engine. It consumes
//! the small set of collaborator interfaces defined here:
//!
//! - [`IndexCatalog`]: index name → [`IndexClient`] handle
//! - [`IndexClient`]: request templates and search execution
//! - [`IndexReader`]: field name → [`FieldValueIndex`] (per-document string values)
//! - [`SearchRequest`] / [`Request`]: the request kinds a client understands
//!
//! Shared value types ride along: [`DocSet`] (scored document ids plus
//! per-join foreign matches), [`FilterSet`], [`FacetCounts`], the
//! [`RequestParams`] binder interface and the hierarchical [`Timer`].
//!
//! # Example
//!
//! ```rust
//! use xsearch_index::{Filter, SearchRequest};
//!
//! let request = SearchRequest::field()
//!     .with_query_string("brand:acme")
//!     .with_filter(Filter::term("lang", "en"));
//!
//! assert_eq!(request.rows, xsearch_index::DEFAULT_ROWS);
//! assert_eq!(request.filters.len(), 1);
//! ```

mod client;
mod doc;
mod error;
mod facet;
mod field_index;
mod filter;
mod params;
mod reader;
mod request;
mod timer;

pub use client::{IndexCatalog, IndexClient, SearchResult};
pub use doc::{DocId, DocRow, DocSet, ForeignMatch};
pub use error::SyntaxError;
pub use facet::{FacetCount, FacetCounts};
pub use field_index::{FieldValueIndex, StringIndex};
pub use filter::{Filter, FilterSet};
pub use params::{parse_param, ParamMap, RequestParams};
pub use reader::IndexReader;
pub use request::{FacetField, Request, SearchKind, SearchRequest};
pub use timer::{Timer, TimerScope};

/// Default number of rows a search request renders.
pub const DEFAULT_ROWS: usize = 10;

/// Default minimum count for a facet value to be reported.
pub const DEFAULT_FACET_MIN_COUNT: usize = 1;
