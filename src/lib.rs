//! linkrot: a single-site broken link crawler
//!
//! This crate crawls every reachable page of one website starting from its
//! root, records which links resolve with HTTP 404, and tracks every page
//! that references each broken link. Progress is checkpointed to a JSON
//! snapshot so a long crawl can be inspected mid-run or resumed.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for linkrot operations
#[derive(Debug, Error)]
pub enum LinkrotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page store error: {0}")]
    Store(#[from] state::StoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Root page {url} could not be fetched: {reason}")]
    RootUnreachable { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for linkrot operations
pub type Result<T> = std::result::Result<T, LinkrotError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{CrawlSession, PageStatus, PageStore};
pub use url::{canonicalize, CrawlPolicy, Origin};
