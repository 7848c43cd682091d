//! Greylit main entry point
//!
//! This is the command-line interface for the Greylit search aggregator.

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use greylit::config::{load_config_with_hash, Config};
use greylit::engine::{Aggregator, CountOutcome, HttpFetcher};
use greylit::output::{print_results, write_markdown_report, SearchSummary};
use greylit::{run_search, AggregationRequest, SearchOutcome, SearchParams, SortOrder};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Greylit: a grey literature search aggregator
///
/// Greylit searches GOV.UK together with the departmental blogs listed in its
/// configuration, then merges and deduplicates the results into a single
/// ranked list.
#[derive(Parser, Debug)]
#[command(name = "greylit")]
#[command(version)]
#[command(about = "A grey literature search aggregator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Words to search for
    #[arg(short, long)]
    keywords: String,

    /// Restrict the search to a department; may be repeated
    #[arg(short, long = "department", value_name = "TITLE")]
    departments: Vec<String>,

    /// Earliest publication date (DD/MM/YYYY)
    #[arg(long, value_parser = parse_day_month_year)]
    from: Option<NaiveDate>,

    /// Latest publication date (DD/MM/YYYY)
    #[arg(long, value_parser = parse_day_month_year)]
    to: Option<NaiveDate>,

    /// Result ordering: relevance, newest or oldest
    #[arg(long, default_value = "relevance")]
    sort: SortOrder,

    /// Number of results to collect
    #[arg(short = 'n', long, default_value_t = 20)]
    max_results: usize,

    /// Also write a markdown report to this path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the URLs that would be queried
    #[arg(long, conflicts_with = "count_only")]
    dry_run: bool,

    /// Only estimate how many results are available
    #[arg(long, conflicts_with = "dry_run")]
    count_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let params = SearchParams {
        keywords: cli.keywords.clone(),
        departments: cli.departments.clone(),
        from: cli.from,
        to: cli.to,
        sort: cli.sort,
        max_results: cli.max_results,
    };
    let request =
        AggregationRequest::from_config(&config, &params).context("invalid search request")?;

    if cli.dry_run {
        handle_dry_run(&config, &request);
        return Ok(());
    }

    let fetcher = Arc::new(HttpFetcher::new(&config.client).context("failed to build HTTP client")?);

    if cli.count_only {
        handle_count(fetcher, &config, &request).await
    } else {
        handle_search(fetcher, &config, &request, &cli, config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("greylit=info,warn"),
            1 => EnvFilter::new("greylit=debug,info"),
            2 => EnvFilter::new("greylit=trace,debug"),
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

fn parse_day_month_year(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y")
        .map_err(|e| format!("expected DD/MM/YYYY: {}", e))
}

/// Handles the --dry-run mode: shows the configuration and the URLs to query
fn handle_dry_run(config: &Config, request: &AggregationRequest) {
    println!("=== Greylit Dry Run ===\n");

    println!("Client:");
    println!("  User agent: {}", config.client.user_agent);
    println!("  Timeout: {}s", config.client.timeout_secs);

    println!("\nSearch:");
    println!(
        "  Max concurrent requests: {}",
        config.search.max_concurrent_requests
    );
    println!("  Max count pages: {}", config.search.max_count_pages);
    println!("  Max failed fetches: {}", config.search.max_failed_fetches);
    println!("  Max results: {}", request.max_results());

    println!("\nDepartments ({}):", config.departments.len());
    for department in &config.departments {
        println!("  - {}", department.title);
    }

    println!("\nCanonical search:");
    println!("  {}", request.canonical_url());

    println!("\nSatellite sources ({}):", request.sources().len());
    for source in request.sources() {
        println!("  - {} ({})", source.descriptor.name, source.descriptor.title);
        println!("    * {}", source.search_url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --count-only mode: runs count reconciliation and exits
async fn handle_count(
    fetcher: Arc<HttpFetcher>,
    config: &Config,
    request: &AggregationRequest,
) -> anyhow::Result<()> {
    let aggregator = Aggregator::new(fetcher, config)?;

    match aggregator
        .reconcile_counts(request)
        .await
        .context("count reconciliation failed")?
    {
        CountOutcome::NoResults => println!("No results."),
        CountOutcome::Estimate(estimate) => {
            println!("=== Estimated Results ===\n");
            println!("  Canonical search: {}", estimate.canonical_total);
            println!("  Satellite sources with results: {}", estimate.sources.len());
            for source in &estimate.sources {
                println!("    - {}", source.descriptor.name);
            }
            println!("  Total: {}", estimate.total);
        }
    }

    Ok(())
}

/// Handles the main search operation
async fn handle_search(
    fetcher: Arc<HttpFetcher>,
    config: &Config,
    request: &AggregationRequest,
    cli: &Cli,
    config_hash: String,
) -> anyhow::Result<()> {
    tracing::info!(
        "Searching for '{}' across {} satellite sources",
        cli.keywords,
        request.sources().len()
    );

    let report = match run_search(fetcher, config, request)
        .await
        .context("search failed")?
    {
        SearchOutcome::NoResults => {
            println!("No results.");
            return Ok(());
        }
        SearchOutcome::Found(report) => report,
    };

    print_results(&report, request.max_results()).context("failed to print results")?;

    if let Some(path) = &cli.output {
        let summary = SearchSummary::new(
            cli.keywords.as_str(),
            cli.sort,
            request.max_results(),
            config_hash,
            report,
        );
        write_markdown_report(&summary, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✓ Report written to: {}", path.display());
    }

    Ok(())
}
