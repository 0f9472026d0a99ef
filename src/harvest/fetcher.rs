//! Page fetching
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with a proper user agent string
//! - GET requests for the listing page and detail pages
//! - Classifying failures into per-URL [`FetchError`]s
//!
//! There is no retry or backoff. A failed fetch is reported once and the URL
//! is skipped.

use crate::config::{HttpConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("{url} unavailable: {reason}")]
    Unavailable { url: String, reason: String },
}

impl FetchError {
    /// The URL the failed request was for
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. }
            | FetchError::Unavailable { url, .. } => url,
        }
    }
}

/// Source of raw page documents
///
/// Implementations must be shareable across workers. No caching and no retry
/// are expected.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the raw document body
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::{HttpConfig, UserAgentConfig};
/// use catalog_harvest::harvest::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(http.timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from user agent and timeout settings
    pub fn from_config(
        user_agent: &UserAgentConfig,
        http: &HttpConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, http)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Any body is parsed; a non-HTML Content-Type is only worth a warning
        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("html") {
                tracing::warn!("{} served as {}, parsing anyway", url, content_type);
            }
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_fetcher() -> HttpFetcher {
        HttpFetcher::from_config(&UserAgentConfig::default(), &HttpConfig::default()).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html><body>hi</body></html>", "text/html"),
            )
            .mount(&mock_server)
            .await;

        let body = create_test_fetcher()
            .fetch(&format!("{}/page", mock_server.uri()))
            .await
            .unwrap();
        assert!(body.contains("hi"));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing", mock_server.uri());
        let err = create_test_fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(err.url(), url);
    }

    #[tokio::test]
    async fn test_fetch_accepts_non_html_content_type() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<div class=\"summary_text\">plain</div>", "text/plain"),
            )
            .mount(&mock_server)
            .await;

        let body = create_test_fetcher()
            .fetch(&format!("{}/title/tt1/", mock_server.uri()))
            .await
            .unwrap();
        assert!(body.contains("summary_text"));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Nothing listens on port 9 on the loopback interface
        let err = create_test_fetcher()
            .fetch("http://127.0.0.1:9/")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
