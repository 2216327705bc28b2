use crate::config::SiteConfig;
use crate::state::PageStore;
use crate::url::{canonicalize, Origin};
use crate::ConfigError;
use std::collections::HashSet;

/// Decides which discovered links are admitted to the crawl
///
/// A link is admitted exactly once: the moment it is first seen while its
/// canonical URL is still unvisited.
#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    origin: Origin,
    skip_patterns: Vec<String>,
}

impl CrawlPolicy {
    pub fn new(origin: Origin, skip_patterns: Vec<String>) -> Self {
        Self {
            origin,
            skip_patterns,
        }
    }

    /// Builds the policy from the `[site]` configuration table
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            Origin::parse(&config.origin)?,
            config.skip_patterns.clone(),
        ))
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Returns true for non-empty links that are same-origin absolute URLs
    /// or root-relative paths
    ///
    /// Protocol-relative links (`//host/path`) are out of scope.
    pub fn is_in_scope(&self, raw: &str) -> bool {
        if raw.trim().is_empty() {
            return false;
        }
        if self.origin.owns(raw) {
            return true;
        }
        raw.starts_with('/') && !raw.starts_with("//")
    }

    /// Returns true if `raw` matches a known non-content pattern
    pub fn is_skipped(&self, raw: &str) -> bool {
        self.skip_patterns.iter().any(|p| raw.contains(p.as_str()))
    }

    /// Decides whether a raw link should be queued for crawling
    ///
    /// # Rejection Rules
    ///
    /// 1. Empty or whitespace-only input
    /// 2. Links on another host, and relative links that are not root-relative
    /// 3. The root itself (`/` or the origin root URL)
    /// 4. Links matching a skip pattern (e.g., print views)
    /// 5. Links whose canonical URL is already visited or broken
    pub fn should_crawl(&self, raw: &str, store: &PageStore) -> bool {
        if !self.is_in_scope(raw) || raw == "/" || self.is_skipped(raw) {
            return false;
        }

        let canonical = canonicalize(&self.origin, raw);
        if canonical == self.origin.root_url() {
            return false;
        }

        !store.status(&canonical).is_resolved()
    }

    /// Canonical URLs of the admissible links in `hrefs`
    ///
    /// Document order is preserved and each canonical URL appears once, at
    /// its first occurrence.
    pub fn eligible_links(&self, hrefs: &[String], store: &PageStore) -> Vec<String> {
        let mut seen = HashSet::new();
        hrefs
            .iter()
            .filter(|href| self.should_crawl(href, store))
            .map(|href| canonicalize(&self.origin, href))
            .filter(|canonical| seen.insert(canonical.clone()))
            .collect()
    }
}
