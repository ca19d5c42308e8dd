//! sreality-scraper main entry point
//!
//! This is the command-line interface for the sreality.cz listing scraper.

use anyhow::Context;
use clap::Parser;
use sreality_scraper::config::{load_config_with_hash, validate, Config};
use sreality_scraper::output::{load_statistics, print_run_summary, print_statistics};
use sreality_scraper::prompt::{prompt_category, ConsoleOperator};
use sreality_scraper::store::{CsvStore, StorePaths};
use sreality_scraper::{run_pipeline, Category, Stage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// sreality-scraper: incremental listing scraper for sreality.cz
///
/// Discovers search result pages for a property category, harvests the
/// listing links on them and scrapes every listing into a CSV dataset.
/// Interrupted runs resume where they stopped.
#[derive(Parser, Debug)]
#[command(name = "sreality-scraper")]
#[command(version)]
#[command(about = "Incremental listing scraper for sreality.cz", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Category: menu number 1-5, site slug (byty) or English name (apartment)
    #[arg(long)]
    category: Option<String>,

    /// Search result pages to harvest per sub-type (asked when omitted)
    #[arg(long)]
    pages: Option<String>,

    /// Passcode for page counts above the free limit (asked when needed)
    #[arg(long)]
    passcode: Option<String>,

    /// Stages to run
    #[arg(long, value_enum, default_value_t = Stage::All)]
    stage: Stage,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the files a run would use, without scraping
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show progress statistics from the CSV stores and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    if cli.stats {
        return handle_stats(&config, cli.category.as_deref());
    }

    let category = match cli.category.as_deref() {
        Some(category) => category.parse::<Category>()?,
        None => prompt_category()?,
    };

    if cli.dry_run {
        handle_dry_run(&config, category, cli.stage);
        return Ok(());
    }

    let mut operator = ConsoleOperator::new(cli.pages, cli.passcode);
    match run_pipeline(config, category, cli.stage, &mut operator).await {
        Ok(report) => {
            print_run_summary(category, &report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sreality_scraper=info,warn"),
            1 => EnvFilter::new("sreality_scraper=debug,info"),
            2 => EnvFilter::new("sreality_scraper=trace,debug"),
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

/// Loads the configuration file, or validated defaults when none is given
fn load_configuration(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            let config = Config::default();
            validate(&config)?;
            tracing::info!("No configuration file given, using defaults");
            Ok(config)
        }
    }
}

/// Handles the --dry-run mode: shows the resolved configuration and files
fn handle_dry_run(config: &Config, category: Category, stage: Stage) {
    let paths = StorePaths::new(&config.storage);

    println!("=== sreality-scraper Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Country code: {}", config.site.country_code);
    println!("  Currency: {}", config.site.currency_code);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nWorkers:");
    println!("  Harvest: {}", config.harvest.workers);
    println!("  Scrape: {}", config.scrape.workers);

    println!("\nAccess:");
    println!("  Free page limit: {}", config.access.free_page_limit);
    println!(
        "  Passcode: {}",
        if config.access.passcode.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    println!(
        "\nCategory: {} ({}), {} sub-types",
        category.label(),
        category.slug(),
        category.sub_types().len()
    );
    println!("Stage: {:?}", stage);

    println!("\nFiles:");
    println!("  Page URLs: {}", paths.page_urls(category).display());
    println!("  Listing URLs: {}", paths.listing_urls(category).display());
    println!("  Listings: {}", paths.listings(category).display());

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows progress read from the CSV stores
fn handle_stats(config: &Config, category: Option<&str>) -> anyhow::Result<()> {
    let categories = match category {
        Some(category) => vec![category.parse::<Category>()?],
        None => Category::ALL.to_vec(),
    };

    let store = CsvStore::new();
    let paths = StorePaths::new(&config.storage);

    let stats = categories
        .into_iter()
        .map(|category| load_statistics(&store, &paths, category))
        .collect::<Result<Vec<_>, _>>()?;

    print_statistics(&stats);
    Ok(())
}
