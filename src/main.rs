//! Site-Spider main entry point
//!
//! This is the command-line interface for the Site-Spider single-site crawler.

use anyhow::Context;
use clap::Parser;
use site_spider::config::{load_config, Config};
use site_spider::output::{generate_markdown_report, print_report, CrawlReport};
use site_spider::{HttpFetcher, Spider};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Spider: a polite single-site crawler
///
/// Site-Spider walks one site breadth-first from a seed URL, respecting
/// robots.txt and pacing its requests. Links leaving the site are listed
/// (and optionally checked) but never followed.
#[derive(Parser, Debug)]
#[command(name = "site-spider")]
#[command(version)]
#[command(about = "A polite single-site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Maximum link distance from the seed (overrides the config file)
    #[arg(short, long, value_name = "N")]
    depth: Option<u32>,

    /// Write a Markdown report to this path (overrides the config file)
    #[arg(short, long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    if let Some(depth) = cli.depth {
        config.site.max_depth = Some(depth);
    }
    if let Some(report) = &cli.report {
        config.output.report_path = Some(report.display().to_string());
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, cli.verbose > 0, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_spider=info,warn"),
            1 => EnvFilter::new("site_spider=debug,info"),
            2 => EnvFilter::new("site_spider=trace,debug"),
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
    println!("=== Site-Spider Dry Run ===\n");

    println!("Site:");
    println!("  Seed: {}", config.site.seed);
    match config.site.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }

    println!("\nCrawler Configuration:");
    println!("  Fetch interval: {}ms", config.crawler.fetch_interval);
    println!("  Jitter: {}ms", config.crawler.jitter);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);
    println!("  Restrict to scheme: {}", config.crawler.restrict_to_scheme);
    println!(
        "  Check external links: {}",
        config.crawler.check_external_links
    );
    println!("  Workers: {}", config.crawler.workers);
    println!(
        "  Stop on fetch error: {}",
        config.crawler.stop_on_fetch_error
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  Robot: {}", config.user_agent.robot);
    println!("  Browser: {}", config.user_agent.browser);

    println!("\nOutput:");
    match &config.output.report_path {
        Some(path) => println!("  Report: {}", path),
        None => println!("  Report: none"),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler)
        .context("Failed to build HTTP client")?;
    let spider = Spider::from_config(config, fetcher)
        .with_context(|| format!("Invalid seed URL {:?}", config.site.seed))?;

    let max_depth = config.site.max_depth;
    let summary = match spider.crawl(max_depth).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).context("Crawl aborted");
        }
    };

    let report = CrawlReport::from_spider(&spider, &summary, max_depth);

    if !quiet {
        print_report(&report, verbose);
    }

    if let Some(path) = &config.output.report_path {
        generate_markdown_report(&report, Path::new(path))
            .with_context(|| format!("Failed to write report to {}", path))?;
        tracing::info!("Report written to: {}", path);
    }

    Ok(())
}
