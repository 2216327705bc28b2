use serde::Deserialize;

/// Main configuration structure for linkrot
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// The single site being crawled
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin all crawling is scoped to (e.g., "https://docs.example.com")
    pub origin: String,

    /// Substrings marking non-content pages that are never queued
    #[serde(rename = "skip-patterns", default = "default_skip_patterns")]
    pub skip_patterns: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of fetch attempts before traversal is cut off
    #[serde(rename = "max-visits")]
    pub max_visits: u64,

    /// Number of successful visits between checkpoint writes
    #[serde(rename = "checkpoint-interval")]
    pub checkpoint_interval: u64,

    /// What happens once `max_visits` is exceeded
    #[serde(rename = "cap-mode", default)]
    pub cap_mode: CapMode,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Behavior of the crawl cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapMode {
    /// Stop the whole crawl at the first attempt over the cap
    #[default]
    Halt,
    /// Count and skip every remaining attempt without fetching it
    Prune,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON results snapshot
    #[serde(rename = "results-path")]
    pub results_path: String,

    /// Path to the newline-separated list of broken URLs
    #[serde(rename = "errored-path")]
    pub errored_path: String,

    /// Optional path to a markdown broken-link report
    #[serde(rename = "report-path", default)]
    pub report_path: Option<String>,
}

fn default_skip_patterns() -> Vec<String> {
    vec!["_print".to_string()]
}

fn default_request_timeout() -> u64 {
    30
}
