//! URL handling module for linkrot
//!
//! This module provides the crawl origin, link canonicalization, and the
//! admission policy deciding which discovered links get crawled.

mod normalize;
mod policy;

use crate::config::validation::validate_origin;
use crate::ConfigError;
use std::fmt;
use url::Url;

// Re-export main functions
pub use normalize::{canonicalize, strip_query_and_fragment};
pub use policy::CrawlPolicy;

/// The fixed `scheme://host[:port]` all crawling is scoped to
///
/// Stored without a trailing slash, with the host lowercased and any
/// default port dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(String);

impl Origin {
    /// Parses and validates an origin string
    ///
    /// # Examples
    ///
    /// ```
    /// use linkrot::url::Origin;
    ///
    /// let origin = Origin::parse("https://Docs.Example.com:443/").unwrap();
    /// assert_eq!(origin.as_str(), "https://docs.example.com");
    /// assert_eq!(origin.root_url(), "https://docs.example.com/");
    /// ```
    pub fn parse(origin: &str) -> Result<Self, ConfigError> {
        validate_origin(origin)?;
        let url = Url::parse(origin)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", origin, e)))?;
        Ok(Self(url.origin().ascii_serialization()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical URL of the site root, where every crawl starts
    pub fn root_url(&self) -> String {
        format!("{}/", self.0)
    }

    /// Returns true if `link` is an absolute URL on this origin
    ///
    /// The origin must be followed by a path separator or the end of the
    /// string, so `https://site.com.evil.net` does not match
    /// `https://site.com`.
    pub fn owns(&self, link: &str) -> bool {
        link.strip_prefix(self.0.as_str())
            .map(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(false)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_trailing_slash() {
        let origin = Origin::parse("https://docs.example.com/").unwrap();
        assert_eq!(origin.as_str(), "https://docs.example.com");
    }

    #[test]
    fn test_parse_keeps_explicit_port() {
        let origin = Origin::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(origin.as_str(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_parse_rejects_path() {
        assert!(Origin::parse("https://docs.example.com/guide").is_err());
    }

    #[test]
    fn test_owns() {
        let origin = Origin::parse("https://site.com").unwrap();
        assert!(origin.owns("https://site.com"));
        assert!(origin.owns("https://site.com/"));
        assert!(origin.owns("https://site.com/docs/page"));

        assert!(!origin.owns("https://site.com.evil.net/page"));
        assert!(!origin.owns("https://other.com/page"));
        assert!(!origin.owns("http://site.com/page"));
        assert!(!origin.owns("/docs/page"));
    }

    #[test]
    fn test_display() {
        let origin = Origin::parse("https://site.com").unwrap();
        assert_eq!(format!("{}", origin), "https://site.com");
    }
}
