//! News-Harvest main entry point
//!
//! This is the command-line interface for the News-Harvest link snapshotter.

use anyhow::Context;
use clap::Parser;
use news_harvest::config::{load_config_with_hash, Config};
use news_harvest::crawler::{Harvester, SearchQuery};
use news_harvest::output::{load_statistics, print_statistics};
use news_harvest::storage::Ledger;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// News-Harvest: snapshot the external links of news sites
///
/// News-Harvest searches a fixed list of news domains for recent pages,
/// collects the outbound links on those pages and saves a PDF of each link it
/// has not seen before, recording every attempt in a CSV ledger.
#[derive(Parser, Debug)]
#[command(name = "news-harvest")]
#[command(version)]
#[command(about = "Snapshot external links found on news sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without doing it
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the ledger and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("news_harvest=info,warn"),
            1 => EnvFilter::new("news_harvest=debug,info"),
            2 => EnvFilter::new("news_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the plan without touching the network
fn handle_dry_run(config: &Config) {
    println!("=== News-Harvest Dry Run ===\n");

    println!("Search:");
    println!("  Endpoint: {}", config.search.endpoint);
    println!("  News only: {}", config.search.news_only);
    println!(
        "  Up to {} results per domain, {} per page, {}ms between pages",
        config.search.max_results, config.search.page_size, config.search.pause_ms
    );

    println!("\nTimeouts:");
    println!("  Page fetch: {}s", config.fetch.timeout_secs);
    println!("  PDF render: {}s", config.renderer.timeout_secs);

    println!("\nPacing:");
    println!("  After each link: {}ms", config.pacing.after_link_ms);
    println!("  After each source page: {}ms", config.pacing.after_page_ms);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  PDFs: {}", config.output.pdf_path().display());
    println!("  Ledger: {}", config.output.ledger_path().display());

    println!("\nDomains ({}):", config.harvest.domains.len());
    for domain in &config.harvest.domains {
        let query = SearchQuery::for_domain(domain, &config.search);
        println!("  - {} (query: {})", domain, query.query);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: summarizes the ledger
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let ledger_path = config.output.ledger_path();
    println!("Ledger: {}\n", ledger_path.display());

    let stats = load_statistics(&ledger_path)
        .with_context(|| format!("Failed to read ledger {}", ledger_path.display()))?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest pass, racing it against Ctrl-C
///
/// On interrupt the pass is dropped between await points; a ledger append has
/// none, so the ledger never holds a partial row. The renderer is then shut
/// down explicitly before exiting.
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    tracing::info!("Domains: {}", config.harvest.domains.len());

    let mut harvester = Harvester::new(config).context("Failed to initialize harvester")?;
    tracing::info!(
        "{} URLs already tracked in {}",
        harvester.ledger().seen_count(),
        harvester.ledger().path().display()
    );

    let outcome = tokio::select! {
        result = harvester.run() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(Ok(_)) => Ok(()),
        Some(Err(e)) => {
            tracing::error!("Fatal error: {}", e);
            Err(e.into())
        }
        None => {
            tracing::warn!("Process interrupted by user");
            harvester.shutdown().await;
            harvester.summary().log();
            Ok(())
        }
    }
}
