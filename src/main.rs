//! Pagewalk main entry point
//!
//! This is the command-line interface for the Pagewalk listing crawler.

use clap::Parser;
use pagewalk::config::{load_config_with_hash, validate, Config};
use pagewalk::crawler::run_crawl;
use pagewalk::output::{print_articles, print_summary, write_json_report};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Pagewalk: a single-host listing crawler
///
/// Pagewalk walks a paginated listing, fetches every item it links to, and
/// reports each item's metadata together with its detail response.
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(version)]
#[command(about = "A single-host listing crawler", long_about = None)]
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

    /// Override the listing request cap from the config file
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Write a JSON report to this path (overrides the config file)
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagewalk=info,warn"),
            1 => EnvFilter::new("pagewalk=debug,info"),
            2 => EnvFilter::new("pagewalk=trace,debug"),
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

/// Applies command-line overrides and re-validates the result
fn apply_overrides(config: &mut Config, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(max_pages) = cli.max_pages {
        tracing::debug!("Overriding max-listing-pages with {}", max_pages);
        config.crawler.max_listing_pages = max_pages;
    }
    if let Some(json) = &cli.json {
        config.output.json_path = Some(json.display().to_string());
    }

    validate(config)?;
    Ok(())
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Pagewalk Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Max listing pages: {}", config.crawler.max_listing_pages);
    println!("  Max item retries: {}", config.crawler.max_item_retries);
    println!(
        "  Rate limit backoff: Retry-After (or {}s) + {}s",
        config.crawler.rate_limit_floor_secs, config.crawler.rate_limit_padding_secs
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nSelectors:");
    println!("  Title: {}", config.selectors.title);
    println!("  URL: {}", config.selectors.url);
    println!("  Submitted: {}", config.selectors.submitted);
    println!("  Score: {}", config.selectors.score);
    println!("  Next: {}", config.selectors.next);

    println!("\nOutput:");
    match &config.output.json_path {
        Some(path) => println!("  JSON report: {}", path),
        None => println!("  JSON report: (none)"),
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would walk up to {} listing pages from {}",
        config.crawler.max_listing_pages, config.crawler.start_url
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Walking {} (up to {} listing requests)",
        config.crawler.start_url,
        config.crawler.max_listing_pages
    );

    let report = match run_crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_articles(&report.articles);
    print_summary(&report);

    if let Some(path) = &config.output.json_path {
        write_json_report(&report, Path::new(path))?;
        println!("\n✓ Report written to: {}", path);
    }

    Ok(())
}
