//! Lazy foreign client / request binding.

use crate::error::{JoinError, Result};
use std::fmt;
use std::sync::Arc;
use xsearch_index::{IndexCatalog, IndexClient, Request, SearchRequest};

/// Two-slot cache holding a join's foreign client and foreign search request.
///
/// Both slots start empty and are filled by the first [`resolve`]; later
/// calls reuse them. `resolve` takes `&mut self`, so one binding has a single
/// writer at a time.
///
/// [`resolve`]: ForeignQueryBinding::resolve
#[derive(Default)]
pub struct ForeignQueryBinding {
    client: Option<Arc<dyn IndexClient>>,
    request: Option<SearchRequest>,
}

impl ForeignQueryBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both slots are filled.
    pub fn is_resolved(&self) -> bool {
        self.client.is_some() && self.request.is_some()
    }

    pub fn client(&self) -> Option<&Arc<dyn IndexClient>> {
        self.client.as_ref()
    }

    pub fn request(&self) -> Option<&SearchRequest> {
        self.request.as_ref()
    }

    /// Fill whichever slots are still empty and return both.
    ///
    /// With an empty `query_template` the request is the client's bare field
    /// search; otherwise it is the named template, which must be a search
    /// request.
    pub fn resolve(
        &mut self,
        index_name: &str,
        query_template: &str,
        catalog: &dyn IndexCatalog,
    ) -> Result<(Arc<dyn IndexClient>, &mut SearchRequest)> {
        let client = match &self.client {
            Some(client) => Arc::clone(client),
            None => {
                let client = catalog
                    .client(index_name)
                    .ok_or_else(|| JoinError::IndexNotFound {
                        name: index_name.to_string(),
                    })?;
                tracing::debug!(index = index_name, "foreign client resolved");
                self.client = Some(Arc::clone(&client));
                client
            }
        };

        let request = match self.request.take() {
            Some(request) => request,
            None => build_request(client.as_ref(), query_template)?,
        };
        Ok((client, self.request.insert(request)))
    }
}

fn build_request(client: &dyn IndexClient, query_template: &str) -> Result<SearchRequest> {
    if query_template.is_empty() {
        return Ok(client.new_field_search());
    }
    match client.request_template(query_template) {
        Some(Request::Search(request)) => {
            tracing::debug!(
                index = client.name(),
                template = query_template,
                "foreign request template resolved"
            );
            Ok(request)
        }
        Some(other) => Err(JoinError::NotASearchTemplate {
            name: query_template.to_string(),
            kind: other.kind(),
        }),
        None => Err(JoinError::TemplateNotFound {
            name: query_template.to_string(),
        }),
    }
}

impl fmt::Debug for ForeignQueryBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignQueryBinding")
            .field("client", &self.client.as_ref().map(|c| c.name().to_string()))
            .field("request", &self.request.is_some())
            .finish()
    }
}
