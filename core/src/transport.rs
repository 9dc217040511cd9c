//! Blocking HTTP execution for `HttpRequest` values.
//!
//! The core never needs this module: any host that can send a `GET` may
//! execute requests itself. `Transport` is the ready-made option built on
//! `ureq`, and `OneRing` pairs it with a client for one-call access.

use tracing::debug;
use ureq::Agent;

use crate::client::OneRingClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::query::Predicate;
use crate::types::{Book, Chapter, Character, Movie, Page, Quote};

/// Executes requests with a shared `ureq::Agent`. Non-2xx statuses come back
/// as data so the client decides what they mean.
#[derive(Clone)]
pub struct Transport {
    agent: Agent,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url();
        let mut builder = self.agent.get(&url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.call()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        debug!(path = %request.path, query = %request.query, status, "request completed");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A client bound to a transport: build, execute and parse in one call.
#[derive(Clone)]
pub struct OneRing {
    client: OneRingClient,
    transport: Transport,
}

impl OneRing {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: OneRingClient::from_config(config),
            transport: Transport::new(config),
        }
    }

    /// Configure from `ONE_API_TOKEN` and `ONE_API_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(&ClientConfig::from_env()?))
    }

    pub fn client(&self) -> &OneRingClient {
        &self.client
    }

    pub fn books(&self, filters: &[Predicate]) -> Result<Page<Book>, ApiError> {
        let request = self.client.build_books(filters)?;
        self.client.parse_books(self.transport.execute(&request)?)
    }

    pub fn chapters_from_book(&self, book_id: &str, filters: &[Predicate]) -> Result<Page<Chapter>, ApiError> {
        let request = self.client.build_chapters_from_book(book_id, filters)?;
        self.client.parse_chapters(self.transport.execute(&request)?)
    }

    pub fn movies(&self, filters: &[Predicate]) -> Result<Page<Movie>, ApiError> {
        let request = self.client.build_movies(filters)?;
        self.client.parse_movies(self.transport.execute(&request)?)
    }

    pub fn quotes_from_movie(&self, movie_id: &str, filters: &[Predicate]) -> Result<Page<Quote>, ApiError> {
        let request = self.client.build_quotes_from_movie(movie_id, filters)?;
        self.client.parse_quotes(self.transport.execute(&request)?)
    }

    pub fn characters(&self, filters: &[Predicate]) -> Result<Page<Character>, ApiError> {
        let request = self.client.build_characters(filters)?;
        self.client.parse_characters(self.transport.execute(&request)?)
    }

    pub fn quotes_from_character(
        &self,
        character_id: &str,
        filters: &[Predicate],
    ) -> Result<Page<Quote>, ApiError> {
        let request = self.client.build_quotes_from_character(character_id, filters)?;
        self.client.parse_quotes(self.transport.execute(&request)?)
    }

    pub fn quotes(&self, filters: &[Predicate]) -> Result<Page<Quote>, ApiError> {
        let request = self.client.build_quotes(filters)?;
        self.client.parse_quotes(self.transport.execute(&request)?)
    }

    pub fn chapters(&self, filters: &[Predicate]) -> Result<Page<Chapter>, ApiError> {
        let request = self.client.build_chapters(filters)?;
        self.client.parse_chapters(self.transport.execute(&request)?)
    }
}
