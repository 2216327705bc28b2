//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - Summarizing a results snapshot into statistics
//! - Printing statistics for the `--stats` mode
//! - Writing the markdown broken-link report

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use stats::{
    load_statistics, print_statistics, statistics_from_snapshot, BrokenLink, CrawlStatistics,
};
