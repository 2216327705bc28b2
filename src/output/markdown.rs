//! Markdown broken-link report
//!
//! This module renders crawl statistics as a human-readable report listing
//! every broken URL together with the pages that reference it.

use crate::output::stats::CrawlStatistics;
use crate::url::Origin;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Writes a markdown report to `output_path`, creating parent directories
pub fn generate_markdown_report(
    stats: &CrawlStatistics,
    origin: &Origin,
    output_path: &Path,
) -> std::io::Result<()> {
    let markdown = format_markdown_report(stats, origin, Utc::now());

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, markdown)
}

/// Formats crawl statistics as markdown
pub fn format_markdown_report(
    stats: &CrawlStatistics,
    origin: &Origin,
    generated_at: DateTime<Utc>,
) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Broken Link Report: {}\n\n", origin));
    md.push_str(&format!(
        "Generated {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str("## Overview\n\n");
    md.push_str("| Status | Pages |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Visited | {} |\n", stats.visited));
    md.push_str(&format!("| Broken (404) | {} |\n", stats.broken));
    if stats.pending > 0 {
        md.push_str(&format!("| Not yet crawled | {} |\n", stats.pending));
    }
    md.push_str(&format!("| Total | {} |\n\n", stats.total_pages));

    if stats.broken_links.is_empty() {
        md.push_str("No broken links found.\n");
        return md;
    }

    md.push_str("## Broken Links\n\n");
    for link in &stats.broken_links {
        md.push_str(&format!("### {}\n\n", link.url));
        if link.referrers.is_empty() {
            md.push_str("- (crawl origin)\n");
        }
        for referrer in &link.referrers {
            md.push_str(&format!("- {}\n", referrer));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::stats::BrokenLink;
    use chrono::TimeZone;

    fn origin() -> Origin {
        Origin::parse("https://site.com").unwrap()
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_report_lists_referrers() {
        let stats = CrawlStatistics {
            total_pages: 3,
            visited: 2,
            broken: 1,
            pending: 0,
            broken_links: vec![BrokenLink {
                url: "https://site.com/gone".to_string(),
                referrers: vec![
                    "https://site.com/".to_string(),
                    "https://site.com/a".to_string(),
                ],
            }],
        };

        let md = format_markdown_report(&stats, &origin(), generated_at());

        assert!(md.starts_with("# Broken Link Report: https://site.com\n"));
        assert!(md.contains("Generated 2024-03-01 12:30:00 UTC"));
        assert!(md.contains("| Broken (404) | 1 |"));
        assert!(md.contains(
            "### https://site.com/gone\n\n- https://site.com/\n- https://site.com/a\n"
        ));
    }

    #[test]
    fn test_report_without_broken_links() {
        let stats = CrawlStatistics {
            total_pages: 1,
            visited: 1,
            broken: 0,
            pending: 0,
            broken_links: Vec::new(),
        };

        let md = format_markdown_report(&stats, &origin(), generated_at());
        assert!(md.contains("No broken links found."));
        assert!(!md.contains("## Broken Links"));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports/report.md");
        let stats = CrawlStatistics {
            total_pages: 0,
            visited: 0,
            broken: 0,
            pending: 0,
            broken_links: Vec::new(),
        };

        generate_markdown_report(&stats, &origin(), &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("# Broken Link Report"));
    }
}
