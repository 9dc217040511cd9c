//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The client builds `HttpRequest`
//! values and parses `HttpResponse` values; whoever holds the network
//! executes the round-trip in between. Every One API endpoint is a `GET`,
//! so a request is just a URL, a raw query string and headers.

/// An outgoing `GET` request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Base URL joined with the endpoint path, without a query component.
    pub path: String,
    /// Raw query string, already escaped. Attach it verbatim.
    pub query: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Full request URL. An empty query leaves out the `?` entirely.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
