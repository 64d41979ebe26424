//! Cross-index joins for xsearch.
//!
//! A join augments the result of a search on a *local* index with documents
//! from a separately queried *foreign* index, correlating the two on equal
//! string values of one field per side.
//!
//! # Architecture
//!
//! - [`JoinSpec`]: one join definition (foreign index, query, correlated
//!   fields, filters, join type, return flags) plus its lazily resolved
//!   [`ForeignQueryBinding`]
//! - [`JoinList`]: the ordered joins of a request
//! - [`JoinOrchestrator`]: runs the foreign search and the merge
//! - [`JoinResult`] / [`JoinFacet`]: per-join outputs kept for rendering
//! - [`JoinConfig`]: TOML settings
//!
//! Joins are read from XML (`<join indexName=".." localField=".." ...>`) and
//! overridden per request through `jq<position>` parameters.
//!
//! # Example
//!
//! ```ignore
//! use xsearch_join::{JoinList, JoinOrchestrator};
//!
//! let mut joins = JoinList::from_xml(&config_xml)?;
//! let orchestrator = JoinOrchestrator::with_defaults(catalog);
//! orchestrator.bind_from_request(&mut joins, &params)?;
//!
//! let outcome = orchestrator
//!     .apply_all(&mut joins, &request, reader.as_ref(), docs, &timer)
//!     .await?;
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod list;
pub mod merge;
pub mod orchestrator;
pub mod result;
pub mod spec;
pub mod xml;

mod params;

pub use binding::ForeignQueryBinding;
pub use config::{JoinConfig, DEFAULT_MAX_JOIN_ROWS};
pub use error::{ErrorCode, JoinError, Result};
pub use list::JoinList;
pub use merge::JoinMerge;
pub use orchestrator::{JoinInput, JoinOrchestrator, JoinOutcome};
pub use result::{JoinFacet, JoinResult};
pub use spec::{JoinSpec, JoinType, OuterCollector, PARAM_KEY_PREFIX};
