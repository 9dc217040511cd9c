//! A local stand-in for the One API.
//!
//! Serves the eight read-only list endpoints from an in-memory `Dataset`,
//! honouring the query grammar in `listing` and the bearer-token check.
//! Every request's path and raw query is appended to a `RequestLog` so
//! tests can assert on exactly what a client sent.

pub mod fixtures;
pub mod listing;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub use fixtures::Dataset;
pub use listing::{Envelope, Listing};

/// A request as the server saw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    /// Raw query exactly as received; `None` when the URL had no `?`.
    pub query: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RequestLog(Arc<RwLock<Vec<RecordedRequest>>>);

impl RequestLog {
    async fn record(&self, uri: &Uri) {
        self.0.write().await.push(RecordedRequest {
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
        });
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.0.read().await.clone()
    }

    /// Snapshot for callers outside the runtime, such as blocking tests.
    pub fn blocking_requests(&self) -> Vec<RecordedRequest> {
        self.0.blocking_read().clone()
    }
}

#[derive(Clone)]
pub struct AppState {
    data: Arc<Dataset>,
    log: RequestLog,
}

pub fn app() -> Router {
    app_with_log(RequestLog::default())
}

pub fn app_with_log(log: RequestLog) -> Router {
    let state = AppState {
        data: Arc::new(Dataset::default()),
        log,
    };
    Router::new()
        .route("/book", get(list_books))
        .route("/book/{id}/chapter", get(list_book_chapters))
        .route("/movie", get(list_movies))
        .route("/movie/{id}/quote", get(list_movie_quotes))
        .route("/character", get(list_characters))
        .route("/character/{id}/quote", get(list_character_quotes))
        .route("/quote", get(list_quotes))
        .route("/chapter", get(list_chapters))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_log(listener: TcpListener, log: RequestLog) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_log(log)).await
}

fn to_docs<'a, T: Serialize + 'a>(items: impl IntoIterator<Item = &'a T>) -> Vec<Value> {
    items
        .into_iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty())
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

async fn respond(state: &AppState, headers: &HeaderMap, uri: &Uri, docs: Vec<Value>) -> Response {
    state.log.record(uri).await;
    info!(path = uri.path(), query = uri.query().unwrap_or(""), "request");

    if !authorized(headers) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized.");
    }
    match Listing::parse(uri.query().unwrap_or("")) {
        Ok(listing) => Json(listing.apply(docs)).into_response(),
        Err(message) => failure(StatusCode::BAD_REQUEST, &message),
    }
}

async fn list_books(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let docs = to_docs(&state.data.books);
    respond(&state, &headers, &uri, docs).await
}

async fn list_book_chapters(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let docs = to_docs(state.data.chapters.iter().filter(|c| c.book == id));
    respond(&state, &headers, &uri, docs).await
}

async fn list_movies(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let docs = to_docs(&state.data.movies);
    respond(&state, &headers, &uri, docs).await
}

async fn list_movie_quotes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let docs = to_docs(state.data.quotes.iter().filter(|q| q.movie == id));
    respond(&state, &headers, &uri, docs).await
}

async fn list_characters(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let docs = to_docs(&state.data.characters);
    respond(&state, &headers, &uri, docs).await
}

async fn list_character_quotes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let docs = to_docs(state.data.quotes.iter().filter(|q| q.character == id));
    respond(&state, &headers, &uri, docs).await
}

async fn list_quotes(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let docs = to_docs(&state.data.quotes);
    respond(&state, &headers, &uri, docs).await
}

async fn list_chapters(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let docs = to_docs(&state.data.chapters);
    respond(&state, &headers, &uri, docs).await
}
