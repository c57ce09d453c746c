/*!
 * Error types for the ENEM catalog.
 *
 * This module contains custom error types for the request-facing parts of
 * the application, using the thiserror crate for ergonomic error definitions.
 * The database layer propagates `anyhow::Error`, which ends up wrapped in
 * `ApiError::Storage`.
 */

use thiserror::Error;

/// Errors raised while validating client-supplied filter, pagination or path input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Year filter outside the accepted range
    #[error("Parameter 'year' must be a positive integer, got {0}")]
    YearOutOfRange(i64),

    /// Page number below 1
    #[error("Parameter 'page' must be at least 1, got {0}")]
    PageOutOfRange(i64),

    /// Page number too large to address
    #[error("Parameter 'page' is out of range, got {0}")]
    PageTooLarge(i64),

    /// Page size outside 1..=max
    #[error("Parameter 'limit' must be between 1 and {max}, got {value}")]
    LimitOutOfRange {
        /// Requested limit
        value: i64,
        /// Largest accepted limit
        max: u32,
    },

    /// Unknown, repeated or non-numeric query parameters
    #[error("{0}")]
    InvalidQuery(String),

    /// Path identifier that is not an integer
    #[error("Question id must be an integer, got '{0}'")]
    InvalidId(String),
}

/// Errors surfaced by the HTTP layer
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range client input
    #[error("Invalid request: {0}")]
    InvalidInput(#[from] FilterError),

    /// Well-formed request with no matching record
    #[error("{0}")]
    NotFound(String),

    /// The store could not execute a query
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    /// Not-found error for a question id lookup
    pub fn question_not_found(id: i64) -> Self {
        Self::NotFound(format!("Question with ID {} not found", id))
    }

    /// Not-found error for an empty random draw
    pub fn no_matching_question() -> Self {
        Self::NotFound("No questions found with the specified criteria".to_string())
    }
}
