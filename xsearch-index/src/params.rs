//! Request parameter access for binders.

use crate::error::SyntaxError;
use std::collections::HashMap;
use std::str::FromStr;

/// Read-only view of a request transaction's parameters.
///
/// Keys are looked up verbatim; callers build prefixed keys themselves.
pub trait RequestParams {
    /// First value of `key`.
    fn param(&self, key: &str) -> Option<&str>;

    /// All values of `key`, in request order.
    fn params(&self, key: &str) -> Vec<&str>;
}

/// In-memory multi-valued parameter map.
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    values: HashMap<String, Vec<String>>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl RequestParams for ParamMap {
    fn param(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    fn params(&self, key: &str) -> Vec<&str> {
        self.values
            .get(key)
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Parse an optional parameter, reporting unparsable values as
/// [`SyntaxError::InvalidNumber`].
pub fn parse_param<T: FromStr>(
    params: &dyn RequestParams,
    key: &str,
) -> Result<Option<T>, SyntaxError> {
    match params.param(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SyntaxError::InvalidNumber {
                key: key.to_string(),
                value: raw.to_string(),
            }),
    }
}
