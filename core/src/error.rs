//! Error types for the One API client.
//!
//! # Design
//! `QueryError` covers everything that can go wrong while turning predicates
//! into a query string; it is always a caller mistake and never retried.
//! `ApiError` is what the client surfaces and wraps `QueryError` unchanged.
//! `NotFound` and `Unauthorized` get dedicated variants because callers act
//! on them differently from other non-2xx statuses, which land in
//! `HttpError` with the raw status code and body.

use thiserror::Error;

use crate::query::Operator;

/// Errors raised while serializing predicates or parsing raw operator and
/// sort-order values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid compare operator: {0:?}")]
    InvalidOperator(String),

    #[error("invalid sort order: {0:?}")]
    InvalidSortOrder(String),

    #[error("cannot filter `{field}` without a value")]
    EmptyValueList { field: String },

    #[error("cannot filter `{field}` with operator {operator} on more than one value")]
    MultiValueOnInequality { field: String, operator: Operator },
}

/// Errors returned by `OneRingClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned 401; the bearer token is missing or rejected.
    #[error("unauthorized: the API token was rejected")]
    Unauthorized,

    /// Any other non-200 status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error(transparent)]
    Query(#[from] QueryError),

    /// The response body did not match the expected envelope.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[cfg(feature = "transport")]
    #[error(transparent)]
    Network(#[from] Box<ureq::Error>),
}

#[cfg(feature = "transport")]
impl From<ureq::Error> for ApiError {
    fn from(e: ureq::Error) -> Self {
        Self::Network(Box::new(e))
    }
}
