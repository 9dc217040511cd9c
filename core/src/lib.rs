//! Synchronous client core for the One API (the-one-api.dev).
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). Filters, sorting and
//! pagination are expressed as `Predicate` values and serialized into the
//! request's raw query string.
//!
//! # Design
//! - `query` is pure: predicates in, query string out, no shared state.
//! - `OneRingClient` holds only a base URL and a token. Each endpoint is
//!   split into `build_*` (produces request) and `parse_*` (consumes
//!   response), so the I/O boundary is explicit.
//! - With the `transport` feature, `OneRing` executes requests through
//!   `ureq` for callers that do not bring their own HTTP stack.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
#[cfg(feature = "transport")]
pub mod transport;
pub mod types;

pub use client::OneRingClient;
pub use config::ClientConfig;
pub use error::{ApiError, QueryError};
pub use http::{HttpRequest, HttpResponse};
pub use query::{merge, serialize, CompositeQuery, Operator, PaginationKey, Predicate, SortOrder};
#[cfg(feature = "transport")]
pub use transport::{OneRing, Transport};
pub use types::{Book, Chapter, Character, Movie, Page, Quote, Status};
