//! Request-parameter binding for joins.
//!
//! For a join at position `N` and a pipeline prefix `p`:
//!
//! | key             | effect                                   |
//! |-----------------|------------------------------------------|
//! | `pjqN`          | replaces the join's query string         |
//! | `pjqN.fq`       | positive filter query (multi-valued)     |
//! | `pjqN.fqn`      | negative filter query (multi-valued)     |
//! | `pjqN.start` .. | forwarded to the foreign request binder  |

use crate::error::{JoinError, Result};
use crate::spec::JoinSpec;
use xsearch_index::{IndexCatalog, RequestParams};

impl JoinSpec {
    /// Override this join from request parameters under `prefix`.
    ///
    /// Resolves the foreign binding so the foreign request can read its own
    /// parameters; resolution failures surface as configuration errors.
    pub fn bind_from_request(
        &mut self,
        params: &dyn RequestParams,
        prefix: &str,
        catalog: &dyn IndexCatalog,
    ) -> Result<()> {
        let key = format!("{prefix}{}", self.param_key());
        if let Some(query) = params.param(&key) {
            self.set_query_string(query);
        }

        let dotted = format!("{key}.");
        self.filters_mut()
            .bind_params(params, &dotted)
            .map_err(|source| JoinError::Bind {
                prefix: dotted.clone(),
                source,
            })?;

        let (_, request) = self.resolve_binding(catalog)?;
        request
            .bind_params(params, &dotted)
            .map_err(|source| JoinError::Bind {
                prefix: dotted.clone(),
                source,
            })?;

        tracing::debug!(
            key = %key,
            filters = self.filters().len(),
            "join bound from request"
        );
        Ok(())
    }
}
