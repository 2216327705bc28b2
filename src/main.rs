//! linkrot main entry point
//!
//! This is the command-line interface for the linkrot broken link crawler.

use anyhow::Context;
use clap::Parser;
use linkrot::config::{load_config_with_hash, Config};
use linkrot::crawler::run_crawl;
use linkrot::output::{generate_markdown_report, load_statistics, print_statistics};
use linkrot::storage::JsonFileStorage;
use linkrot::url::Origin;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// linkrot: find broken links on a single website
///
/// linkrot crawls every page reachable from a site's root, records each
/// link that answers 404 along with the pages referencing it, and
/// checkpoints its progress to a JSON snapshot.
#[derive(Parser, Debug)]
#[command(name = "linkrot")]
#[command(version)]
#[command(about = "A single-site broken link crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Continue from the existing results snapshot instead of starting empty
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "export_report"])]
    resume: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_report"])]
    dry_run: bool,

    /// Show statistics from the results snapshot and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_report"])]
    stats: bool,

    /// Generate the markdown report from the results snapshot and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_report: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_report {
        handle_export_report(&config)?;
    } else {
        handle_crawl(config, cli.resume).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkrot=info,warn"),
            1 => EnvFilter::new("linkrot=debug,info"),
            2 => EnvFilter::new("linkrot=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== linkrot Dry Run ===\n");

    println!("Site:");
    println!("  Origin: {}", config.site.origin);
    println!("  Skip patterns: {}", config.site.skip_patterns.join(", "));

    println!("\nCrawler Configuration:");
    println!("  Max visits: {}", config.crawler.max_visits);
    println!(
        "  Checkpoint interval: {} pages",
        config.crawler.checkpoint_interval
    );
    println!("  Cap mode: {:?}", config.crawler.cap_mode);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);
    println!("  Errored: {}", config.output.errored_path);
    if let Some(report_path) = &config.output.report_path {
        println!("  Report: {}", report_path);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}/", config.site.origin.trim_end_matches('/'));
}

/// Handles the --stats mode: shows statistics from the results snapshot
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Results: {}\n", config.output.results_path);

    let storage = JsonFileStorage::from_config(&config.output);
    match load_statistics(&storage)
        .with_context(|| format!("Failed to read {}", config.output.results_path))?
    {
        Some(stats) => print_statistics(&stats),
        None => println!("No results snapshot found. Run a crawl first."),
    }

    Ok(())
}

/// Handles the --export-report mode: generates the markdown report
fn handle_export_report(config: &Config) -> anyhow::Result<()> {
    let report_path = config
        .output
        .report_path
        .as_deref()
        .context("No report-path set in the [output] section")?;

    println!("=== Exporting Broken Link Report ===\n");
    println!("Results: {}", config.output.results_path);
    println!("Output: {}", report_path);
    println!();

    let storage = JsonFileStorage::from_config(&config.output);
    let origin = Origin::parse(&config.site.origin)?;

    tracing::info!("Loading results snapshot...");
    let stats = load_statistics(&storage)
        .with_context(|| format!("Failed to read {}", config.output.results_path))?
        .with_context(|| format!("No results snapshot at {}", config.output.results_path))?;

    tracing::info!("Generating markdown report...");
    generate_markdown_report(&stats, &origin, Path::new(report_path))
        .with_context(|| format!("Failed to write {}", report_path))?;

    println!("✓ Report exported to: {}", report_path);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, resume: bool) -> anyhow::Result<()> {
    if resume {
        tracing::info!("Resuming crawl of {}", config.site.origin);
    } else {
        tracing::info!("Starting fresh crawl of {}", config.site.origin);
    }
    tracing::info!(
        "Visit cap: {} ({:?}), checkpoint every {} pages",
        config.crawler.max_visits,
        config.crawler.cap_mode,
        config.crawler.checkpoint_interval
    );

    let results_path = config.output.results_path.clone();
    let report = run_crawl(config, resume).await.map_err(|e| {
        tracing::error!("Crawl failed: {}", e);
        e
    })?;

    tracing::info!(
        "Crawl complete: {} fetches, {} pages visited, {} broken",
        report.visited_count,
        report.pages_visited,
        report.pages_broken
    );
    if report.cap_reached {
        tracing::warn!(
            "Visit cap reached with {} pages never fetched",
            report.pages_pending
        );
    }
    tracing::info!("Results written to {}", results_path);

    Ok(())
}
