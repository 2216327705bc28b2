//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Classifying failures into "not found" and everything else

use crate::config::{Config, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Page {
        /// Page body content
        body: String,
    },

    /// The server answered HTTP 404
    NotFound,

    /// Any other failure: non-404 HTTP status, timeout, connection error,
    /// or an unreadable body
    Failed {
        /// HTTP status code, if a response arrived
        status: Option<u16>,
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Human-readable reason for a failed outcome
    pub fn describe(&self) -> String {
        match self {
            Self::Page { .. } => "ok".to_string(),
            Self::NotFound => "HTTP 404".to_string(),
            Self::Failed {
                status: Some(code),
                error,
            } => format!("HTTP {}: {}", code, error),
            Self::Failed { status: None, error } => error.clone(),
        }
    }
}

/// Source of page bodies for the crawl engine
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetches `url`, an absolute canonical URL
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// [`PageFetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher using the user agent and timeout from `config`
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        Ok(Self::new(client))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        fetch_url(&self.client, url).await
    }
}

/// Formats the user agent: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use linkrot::config::UserAgentConfig;
/// use linkrot::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "linkrot".to_string(),
///     crawler_version: "0.1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the result
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 2xx | `Page` |
/// | HTTP 404 | `NotFound` |
/// | Any other status | `Failed` with the status |
/// | Timeout, connection error, body decode error | `Failed` without status |
///
/// No retries are attempted. Redirects are followed by the client.
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchOutcome::Failed {
                status: None,
                error,
            };
        }
    };

    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return FetchOutcome::NotFound;
    }

    if !status.is_success() {
        return FetchOutcome::Failed {
            status: Some(status.as_u16()),
            error: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Page { body },
        Err(e) => FetchOutcome::Failed {
            status: Some(status.as_u16()),
            error: format!("Failed to read body: {}", e),
        },
    }
}
