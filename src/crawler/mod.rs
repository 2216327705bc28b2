//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and 404 classification
//! - HTML link extraction
//! - Referrer bookkeeping for broken links
//! - The depth-first crawl engine

mod aggregator;
mod engine;
mod fetcher;
mod parser;

pub use aggregator::{record_known_broken, record_referrer};
pub use engine::{CrawlEngine, CrawlLimits, CrawlReport};
pub use fetcher::{
    build_http_client, fetch_url, user_agent_string, FetchOutcome, HttpFetcher, PageFetcher,
};
pub use parser::extract_hrefs;

use crate::config::Config;
use crate::output::{generate_markdown_report, statistics_from_snapshot};
use crate::state::PageStore;
use crate::storage::{CheckpointWriter, JsonFileStorage, SnapshotStorage};
use crate::url::CrawlPolicy;
use crate::LinkrotError;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the crawl policy and HTTP client
/// 2. Seed the page store from the last snapshot when `resume` is set
/// 3. Crawl the site from its root
/// 4. Write the final snapshot and errored list
/// 5. Write the markdown report, if one is configured
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `resume` - Continue from the results snapshot instead of starting empty
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(LinkrotError)` - Crawl failed
pub async fn run_crawl(config: Config, resume: bool) -> Result<CrawlReport, LinkrotError> {
    let policy = CrawlPolicy::from_config(&config.site)?;
    let fetcher = HttpFetcher::from_config(&config)?;
    let storage = JsonFileStorage::from_config(&config.output);

    let store = if resume {
        match storage.load_snapshot()? {
            Some(snapshot) => {
                let store = PageStore::from_snapshot(&snapshot);
                if store.is_empty() {
                    tracing::warn!(
                        "Snapshot at {} is empty, starting a fresh crawl",
                        storage.results_path().display()
                    );
                } else {
                    tracing::info!(
                        "Resuming from {} ({} recorded pages)",
                        storage.results_path().display(),
                        store.len()
                    );
                }
                store
            }
            None => {
                tracing::info!(
                    "No snapshot at {}, starting a fresh crawl",
                    storage.results_path().display()
                );
                PageStore::new()
            }
        }
    } else {
        PageStore::new()
    };

    let checkpoint = CheckpointWriter::new(storage, config.crawler.checkpoint_interval);
    let mut engine = CrawlEngine::new(
        policy,
        store,
        fetcher,
        checkpoint,
        CrawlLimits::from(&config.crawler),
    );

    let report = engine.run().await?;
    let (session, _storage) = engine.into_parts();

    if let Some(report_path) = &config.output.report_path {
        let stats = statistics_from_snapshot(&session.store().to_snapshot());
        generate_markdown_report(&stats, session.origin(), Path::new(report_path))?;
        tracing::info!("Report written to {}", report_path);
    }

    Ok(report)
}
