//! Statistics derived from a results snapshot
//!
//! This module summarizes a snapshot for the `--stats` mode and the
//! markdown report.

use crate::state::StatusKind;
use crate::storage::{Snapshot, SnapshotStorage, StorageResult};

/// A broken URL and the pages linking to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    pub url: String,
    pub referrers: Vec<String>,
}

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of resolved pages in the snapshot
    pub total_pages: usize,

    /// Pages fetched successfully
    pub visited: usize,

    /// Pages that returned 404
    pub broken: usize,

    /// Queued pages not fetched yet
    pub pending: usize,

    /// Broken links, most-referenced first
    pub broken_links: Vec<BrokenLink>,
}

impl CrawlStatistics {
    /// Share of resolved pages that are broken, in percent
    pub fn broken_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.broken as f64 / self.total_pages as f64) * 100.0
    }
}

/// Summarizes a snapshot
pub fn statistics_from_snapshot(snapshot: &Snapshot) -> CrawlStatistics {
    let mut visited = 0;
    let mut pending = 0;
    let mut broken_links = Vec::new();

    for (url, entry) in snapshot {
        match entry.status {
            StatusKind::Visited => visited += 1,
            StatusKind::Broken => broken_links.push(BrokenLink {
                url: url.clone(),
                referrers: entry.found_on.clone(),
            }),
            StatusKind::Unvisited => pending += 1,
        }
    }

    broken_links.sort_by(|a, b| {
        b.referrers
            .len()
            .cmp(&a.referrers.len())
            .then_with(|| a.url.cmp(&b.url))
    });

    CrawlStatistics {
        total_pages: visited + broken_links.len(),
        visited,
        broken: broken_links.len(),
        pending,
        broken_links,
    }
}

/// Loads statistics from storage; `None` if no snapshot has been written
pub fn load_statistics(storage: &dyn SnapshotStorage) -> StorageResult<Option<CrawlStatistics>> {
    Ok(storage
        .load_snapshot()?
        .map(|snapshot| statistics_from_snapshot(&snapshot)))
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages resolved: {}", stats.total_pages);
    println!("  Visited: {}", stats.visited);
    println!(
        "  Broken: {} ({:.1}%)",
        stats.broken,
        stats.broken_rate()
    );
    if stats.pending > 0 {
        println!("  Pending: {} (resume to crawl them)", stats.pending);
    }
    println!();

    if stats.broken_links.is_empty() {
        println!("No broken links found.");
        return;
    }

    println!("Broken Links ({}):", stats.broken_links.len());
    for link in &stats.broken_links {
        println!("  {} ({} referring pages)", link.url, link.referrers.len());
    }
}
