//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the catalog harvester.

use anyhow::Context;
use catalog_harvest::config::{load_or_default, validate, Config};
use catalog_harvest::harvest::{collect, harvest};
use catalog_harvest::output::print_summary;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a concurrent catalog scraper
///
/// Fetches the catalog's listing page, extracts a record from every detail
/// page through a fixed pool of workers, and writes a bulk-load document.
/// Without a config file the built-in defaults are used.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version)]
#[command(about = "A concurrent catalog scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the worker pool size
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Override the bulk document path
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Show the resolved configuration and listing size without harvesting
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) =
        load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    match (&cli.config, config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("Using built-in configuration"),
    }

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        return handle_dry_run(&config).await;
    }

    let summary = harvest(&config).await.context("Harvest failed")?;
    print_summary(&summary);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(workers) = cli.workers {
        config.pipeline.worker_count = workers;
    }
    if let Some(output) = &cli.output {
        config.output.bulk_path = output.to_string_lossy().into_owned();
    }
}

/// Handles the --dry-run mode: shows settings and the listing size
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Catalog:");
    println!("  Listing URL: {}", config.catalog.listing_url);
    println!("  Site origin: {}", config.catalog.site_origin);

    println!("\nPipeline:");
    println!("  Workers: {}", config.pipeline.worker_count);
    println!("  Queue capacity: {}", config.pipeline.queue_capacity);
    println!("  Drop incomplete records: {}", config.pipeline.drop_incomplete);

    println!("\nUser Agent: {}", config.user_agent.header_value());
    println!("Output: {}", config.output.bulk_path);

    let urls = collect(config).await.context("Failed to collect listing")?;
    println!("\n✓ Configuration is valid");
    println!("✓ Would harvest {} detail pages", urls.len());

    Ok(())
}
