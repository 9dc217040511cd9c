//! Stateless request builder and response parser for the One API.
//!
//! # Design
//! `OneRingClient` holds only the base URL and the bearer token. Each list
//! endpoint is split into a `build_*` method that turns predicates into an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Predicates are merged and serialized once per request; the resulting
//! raw query is attached to the request verbatim.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::query::{merge, Predicate};
use crate::types::{Book, Chapter, Character, Movie, Page, Quote};

/// Synchronous, stateless client for the One API.
#[derive(Debug, Clone)]
pub struct OneRingClient {
    base_url: String,
    token: String,
}

impl OneRingClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, &config.token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, endpoint: &str, filters: &[Predicate]) -> Result<HttpRequest, ApiError> {
        let query = merge(filters.iter().cloned()).to_query()?;
        let path = format!("{}{endpoint}", self.base_url);
        debug!(path = %path, query = %query, "built request");
        Ok(HttpRequest {
            path,
            query,
            headers: vec![
                ("authorization".to_string(), format!("Bearer {}", self.token)),
                ("accept".to_string(), "application/json".to_string()),
            ],
        })
    }

    pub fn build_books(&self, filters: &[Predicate]) -> Result<HttpRequest, ApiError> {
        self.build("/book", filters)
    }

    pub fn build_chapters_from_book(
        &self,
        book_id: &str,
        filters: &[Predicate],
    ) -> Result<HttpRequest, ApiError> {
        self.build(&format!("/book/{book_id}/chapter"), filters)
    }

    pub fn build_movies(&self, filters: &[Predicate]) -> Result<HttpRequest, ApiError> {
        self.build("/movie", filters)
    }

    pub fn build_quotes_from_movie(
        &self,
        movie_id: &str,
        filters: &[Predicate],
    ) -> Result<HttpRequest, ApiError> {
        self.build(&format!("/movie/{movie_id}/quote"), filters)
    }

    pub fn build_characters(&self, filters: &[Predicate]) -> Result<HttpRequest, ApiError> {
        self.build("/character", filters)
    }

    pub fn build_quotes_from_character(
        &self,
        character_id: &str,
        filters: &[Predicate],
    ) -> Result<HttpRequest, ApiError> {
        self.build(&format!("/character/{character_id}/quote"), filters)
    }

    pub fn build_quotes(&self, filters: &[Predicate]) -> Result<HttpRequest, ApiError> {
        self.build("/quote", filters)
    }

    pub fn build_chapters(&self, filters: &[Predicate]) -> Result<HttpRequest, ApiError> {
        self.build("/chapter", filters)
    }

    pub fn parse_books(&self, response: HttpResponse) -> Result<Page<Book>, ApiError> {
        parse_page(response)
    }

    pub fn parse_movies(&self, response: HttpResponse) -> Result<Page<Movie>, ApiError> {
        parse_page(response)
    }

    pub fn parse_characters(&self, response: HttpResponse) -> Result<Page<Character>, ApiError> {
        parse_page(response)
    }

    /// Parses `/quote` as well as the per-movie and per-character quote lists.
    pub fn parse_quotes(&self, response: HttpResponse) -> Result<Page<Quote>, ApiError> {
        parse_page(response)
    }

    /// Parses `/chapter` as well as the per-book chapter list.
    pub fn parse_chapters(&self, response: HttpResponse) -> Result<Page<Chapter>, ApiError> {
        parse_page(response)
    }
}

fn parse_page<T: DeserializeOwned>(response: HttpResponse) -> Result<Page<T>, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-200 status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::query::{Operator, SortOrder};

    fn client() -> OneRingClient {
        OneRingClient::new("http://localhost:3000", "fake-token")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn status(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_books_without_filters_has_no_query() {
        let req = client().build_books(&[]).unwrap();
        assert_eq!(req.path, "http://localhost:3000/book");
        assert!(req.query.is_empty());
        assert_eq!(req.url(), "http://localhost:3000/book");
    }

    #[test]
    fn every_request_carries_bearer_token() {
        let req = client().build_movies(&[]).unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer fake-token"));
        assert_eq!(req.header("Accept"), Some("application/json"));
    }

    #[test]
    fn nested_endpoints_embed_parent_id() {
        let c = client();
        assert_eq!(
            c.build_chapters_from_book("47", &[]).unwrap().path,
            "http://localhost:3000/book/47/chapter"
        );
        assert_eq!(
            c.build_quotes_from_movie("501", &[]).unwrap().path,
            "http://localhost:3000/movie/501/quote"
        );
        assert_eq!(
            c.build_quotes_from_character("21F3C", &[]).unwrap().path,
            "http://localhost:3000/character/21F3C/quote"
        );
    }

    #[test]
    fn top_level_endpoints() {
        let c = client();
        assert_eq!(c.build_characters(&[]).unwrap().path, "http://localhost:3000/character");
        assert_eq!(c.build_quotes(&[]).unwrap().path, "http://localhost:3000/quote");
        assert_eq!(c.build_chapters(&[]).unwrap().path, "http://localhost:3000/chapter");
    }

    #[test]
    fn filters_are_merged_in_order() {
        let req = client()
            .build_characters(&[
                Predicate::exist("wikiUrl"),
                Predicate::not_exist("hair"),
                Predicate::sort("name", SortOrder::Ascending),
                Predicate::limit(2),
            ])
            .unwrap();
        assert_eq!(req.query, "wikiUrl&!hair&sort=name:asc&limit=2");
        assert_eq!(
            req.url(),
            "http://localhost:3000/character?wikiUrl&!hair&sort=name:asc&limit=2"
        );
    }

    #[test]
    fn invalid_filter_fails_the_build() {
        let err = client()
            .build_movies(&[Predicate::binary(
                "budgetInMillions",
                Operator::LessThan,
                ["100", "200"],
            )])
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Query(QueryError::MultiValueOnInequality { .. })
        ));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = OneRingClient::new("http://localhost:3000/", "t");
        assert_eq!(client.build_books(&[]).unwrap().path, "http://localhost:3000/book");
    }

    #[test]
    fn from_config_uses_base_url_and_token() {
        let config = ClientConfig::new("secret").with_base_url("http://localhost:4000/v2/");
        let client = OneRingClient::from_config(&config);
        assert_eq!(client.base_url(), "http://localhost:4000/v2");
        let req = client.build_quotes(&[]).unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer secret"));
    }

    #[test]
    fn parse_books_success() {
        let page = client()
            .parse_books(ok(r#"{"docs":[{"_id":"5cf5805fb53e011a64671582","name":"The Fellowship Of The Ring"},{"_id":"5cf58077b53e011a64671583","name":"The Two Towers"},{"_id":"5cf58080b53e011a64671584","name":"The Return Of The King"}],"total":3,"limit":1000,"offset":0,"page":1,"pages":1}"#))
            .unwrap();
        assert_eq!(page.docs.len(), 3);
        assert_eq!(page.docs[0].id, "5cf5805fb53e011a64671582");
        assert_eq!(page.docs[2].name, "The Return Of The King");
        assert_eq!(page.status.total, 3);
        assert_eq!(page.status.limit, 1000);
        assert_eq!(page.status.pages, 1);
    }

    #[test]
    fn parse_chapters_success() {
        let page = client()
            .parse_chapters(ok(r#"{"docs":[{"_id":"6091b6d6d58360f988133b8b","chapterName":"A Long-expected Party","book":"5cf5805fb53e011a64671582"}],"total":62,"limit":1,"offset":0,"page":1,"pages":62}"#))
            .unwrap();
        assert_eq!(page.docs[0].chapter_name, "A Long-expected Party");
        assert_eq!(page.docs[0].book, "5cf5805fb53e011a64671582");
        assert_eq!(page.status.pages, 62);
    }

    #[test]
    fn parse_unauthorized() {
        let err = client()
            .parse_quotes(status(401, r#"{"success":false,"message":"Unauthorized."}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn parse_not_found() {
        let err = client().parse_movies(status(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_other_status_keeps_body() {
        let err = client().parse_characters(status(500, "internal error")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, ref body } if body == "internal error"));
    }

    #[test]
    fn parse_bad_json() {
        let err = client().parse_books(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
