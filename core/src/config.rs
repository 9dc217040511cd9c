//! Client configuration.
//!
//! Settings come from code or from the environment:
//!
//! - `ONE_API_TOKEN` - bearer token (required by `from_env`)
//! - `ONE_API_URL` - overrides the API base URL

use std::time::Duration;

use tracing::debug;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://the-one-api.dev/v2";
pub const TOKEN_ENV: &str = "ONE_API_TOKEN";
pub const URL_ENV: &str = "ONE_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    /// Whole-request timeout applied by the transport. `None` waits forever.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: String::new(),
            timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("onering-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_ENV)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{TOKEN_ENV} is not set")))?;

        let mut config = Self::new(token);
        if let Some(base_url) = lookup(URL_ENV).filter(|url| !url.trim().is_empty()) {
            config.base_url = base_url;
        }
        debug!(base_url = %config.base_url, "loaded client config");
        Ok(config)
    }
}
