//! Error types for the join component.
//!
//! Configuration and transport failures share one category
//! ([`ErrorCode::SearchLibrary`]) so callers need a single failure path;
//! request-parameter problems are reported apart as bad requests.

use thiserror::Error;
use xsearch_index::SyntaxError;

/// Category a caller reports a [`JoinError`] under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Server-side failure: configuration or foreign-search transport.
    SearchLibrary,
    /// Client sent malformed join parameters.
    BadRequest,
}

#[derive(Debug, Error)]
pub enum JoinError {
    /// The foreign index isn't registered in the catalog.
    #[error("no client found: {name}")]
    IndexNotFound { name: String },

    /// The foreign client has no template with this name.
    #[error("the request template was not found: {name}")]
    TemplateNotFound { name: String },

    /// The template exists but doesn't produce a search request.
    #[error("the request template is not a search request: {name} ({kind})")]
    NotASearchTemplate { name: String, kind: &'static str },

    #[error("no string index found for the local field: {field}")]
    MissingLocalFieldIndex { field: String },

    #[error("no string index found for the foreign field: {field}")]
    MissingForeignFieldIndex { field: String },

    /// A required join attribute is missing.
    #[error("invalid join: {message}")]
    InvalidSpec { message: String },

    /// Reading or writing the XML join configuration failed.
    #[error("join XML error: {message}")]
    Xml { message: String },

    /// Join settings could not be loaded.
    #[error("join settings error: {message}")]
    Config { message: String },

    /// Foreign search execution or field cache I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed join parameters in the request.
    #[error("bad request parameters under {prefix}: {source}")]
    Bind {
        prefix: String,
        #[source]
        source: SyntaxError,
    },
}

impl JoinError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            JoinError::Bind { .. } => ErrorCode::BadRequest,
            JoinError::IndexNotFound { .. }
            | JoinError::TemplateNotFound { .. }
            | JoinError::NotASearchTemplate { .. }
            | JoinError::MissingLocalFieldIndex { .. }
            | JoinError::MissingForeignFieldIndex { .. }
            | JoinError::InvalidSpec { .. }
            | JoinError::Xml { .. }
            | JoinError::Config { .. }
            | JoinError::Io(_) => ErrorCode::SearchLibrary,
        }
    }

    pub fn is_bad_request(&self) -> bool {
        self.error_code() == ErrorCode::BadRequest
    }
}

/// Result type alias for join operations.
pub type Result<T> = std::result::Result<T, JoinError>;
