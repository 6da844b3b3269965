//! Trendlens main entry point
//!
//! This is the command-line interface for the trendlens pipeline.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use trendlens::config::load_config_with_hash;
use trendlens::output::{create_sink, print_summary};
use trendlens::{Orchestrator, WebDriverRenderer};
use tracing_subscriber::EnvFilter;

/// Trendlens: trend discovery and enrichment pipeline
///
/// Trendlens extracts trending topics from the rendered listing, enriches
/// each with related-topic data from the explore API, and streams the
/// normalized records to a JSONL file or SQLite database.
#[derive(Parser, Debug)]
#[command(name = "trendlens")]
#[command(version = "1.0.0")]
#[command(about = "Trend discovery and enrichment pipeline", long_about = None)]
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

    /// Validate config and show what would run without extracting
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_run(config, config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trendlens=info,warn"),
            1 => EnvFilter::new("trendlens=debug,info"),
            2 => EnvFilter::new("trendlens=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the run plan
fn handle_dry_run(config: &trendlens::Config) {
    println!("=== Trendlens Dry Run ===\n");

    println!("Job:");
    println!("  Geography: {}", config.job.geography);
    println!("  Language: {}", config.job.language);
    println!("  Sort order: {}", config.job.sort_order.as_query_param());
    println!("  Status filter: {}", config.job.status_filter.as_query_param());
    println!("  Max items: {}", config.job.max_items);

    println!("\nListing URL:");
    println!("  {}", config.job.listing_url(&config.network.base_url));

    println!("\nNetwork:");
    println!("  Max parallel: {}", config.network.max_parallel);
    println!("  Chunk size: {}", config.network.chunk_size);
    println!("  Request timeout: {}s", config.network.request_timeout_secs);
    println!("  Retry attempts: {}", config.network.retry_max_attempts);
    println!(
        "  Proxy: {}",
        if config.network.use_proxy {
            config.network.proxy_url.as_deref().unwrap_or("(missing)")
        } else {
            "disabled"
        }
    );

    println!("\nRenderer:");
    println!("  WebDriver: {}", config.renderer.webdriver_url);

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Records: {}", config.output.records_path);
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main pipeline run
async fn handle_run(config: trendlens::Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        "Starting run: geo={}, max_items={}, parallel={}",
        config.job.geography,
        config.job.max_items,
        config.network.max_parallel
    );

    // Renderer setup is the only fatal failure; nothing downstream is
    // possible without a session
    let mut renderer = WebDriverRenderer::connect(&config.renderer.webdriver_url)
        .await
        .context("failed to create renderer session")?;

    let mut sink = create_sink(&config.output, &config_hash, &config.job.geography)
        .context("failed to open output sink")?;

    let orchestrator = Orchestrator::new(config, config_hash);
    let summary = orchestrator
        .run(&mut renderer, sink.as_mut())
        .await
        .context("pipeline run failed")?;

    print_summary(&summary);
    Ok(())
}
