//! Parameter and filter syntax errors.

use thiserror::Error;

/// Malformed request parameters or filter queries.
///
/// These are client mistakes: callers report them as bad requests rather
/// than server faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A numeric parameter could not be parsed.
    #[error("invalid value for parameter {key}: {value:?}")]
    InvalidNumber { key: String, value: String },

    /// A filter parameter was present but blank.
    #[error("empty filter query for parameter {key}")]
    EmptyFilter { key: String },

    /// A quoted phrase was never closed.
    #[error("unterminated quote in query: {query}")]
    UnterminatedQuote { query: String },

    /// Opening and closing parentheses don't pair up.
    #[error("unbalanced parentheses in query: {query}")]
    UnbalancedParentheses { query: String },
}
