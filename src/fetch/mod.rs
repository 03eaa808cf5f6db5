//! HTTP fetching of JSON documents.
//!
//! Every upstream lookup goes through the [`JsonFetcher`] trait: one GET,
//! one parsed JSON document or one [`FetchError`]. There is no cache and no
//! retry; callers issue requests strictly one after another.

pub mod paginate;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Timeout Error: request to {0} timed out")]
    Timeout(String),

    #[error("Error Connecting: {0}")]
    Connection(String),

    #[error("Http Error: {status} {message}")]
    HttpStatus { status: u16, message: String },

    #[error("An Error Occurred: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Unexpected response shape from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid page size {0}, must be greater than 0")]
    InvalidPageSize(u32),
}

impl FetchError {
    /// Whether the upstream answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::HttpStatus { status: 404, .. })
    }

    fn from_transport(err: reqwest::Error, url: &Url) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(redacted(url))
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else {
            FetchError::Request(err)
        }
    }
}

/// Decode a fetched document into its typed form.
pub fn decode<T: DeserializeOwned>(endpoint: &str, document: Value) -> Result<T, FetchError> {
    serde_json::from_value(document).map_err(|source| FetchError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Parse a URL string, mapping failures to [`FetchError::InvalidUrl`].
pub fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Scheme, host and path of a URL. Query strings may carry API keys and
/// never reach the logs.
pub fn redacted(url: &Url) -> String {
    format!(
        "{}://{}{}",
        url.scheme(),
        url.host_str().unwrap_or("unknown"),
        url.path()
    )
}

/// Source of JSON documents.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Issue one GET and return the parsed body.
    async fn get_json(&self, url: &Url) -> Result<Value, FetchError>;
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Sent as `Authorization: Bearer <token>` when present
    pub bearer_token: Option<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            user_agent: format!("player-scout/{}", env!("CARGO_PKG_VERSION")),
            bearer_token: None,
        }
    }
}

/// `reqwest`-backed fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("player-scout")),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| FetchError::InvalidHeader(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn get_json(&self, url: &Url) -> Result<Value, FetchError> {
        info!("Fetching {}", redacted(url));

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| FetchError::from_transport(e, url))?;

        debug!("Fetched {} ({})", redacted(url), status);
        Ok(document)
    }
}

/// Canned-response fetcher for tests. Unknown URLs answer 404.
#[cfg(test)]
pub struct MockFetcher {
    responses: std::collections::HashMap<String, Result<Value, u16>>,
    requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockFetcher {
    pub fn new() -> Self {
        Self {
            responses: std::collections::HashMap::new(),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_json(mut self, url: impl Into<String>, document: Value) -> Self {
        self.responses.insert(url.into(), Ok(document));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Err(status));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl JsonFetcher for MockFetcher {
    async fn get_json(&self, url: &Url) -> Result<Value, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.responses.get(url.as_str()) {
            Some(Ok(document)) => Ok(document.clone()),
            Some(Err(status)) => Err(FetchError::HttpStatus {
                status: *status,
                message: "mock".to_string(),
            }),
            None => Err(FetchError::HttpStatus {
                status: 404,
                message: "Not Found".to_string(),
            }),
        }
    }
}
