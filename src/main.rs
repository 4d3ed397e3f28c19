//! News-Sweep main entry point
//!
//! This is the command-line interface for the News-Sweep search crawler.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use news_sweep::config::{load_config_with_hash, validate, Config};
use news_sweep::crawler::crawl;
use news_sweep::output::{merge_reports, print_statistics, read_report, summarize_report};
use news_sweep::search::{DateWindow, SearchQuery};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// News-Sweep: a date-windowed search crawler
///
/// For every day of a date range, News-Sweep runs a date-filtered search,
/// collects the result links across several pages, fetches every result
/// and counts how many pages mention each content keyword. Completed days
/// are written to a CSV report with a JSON metadata sidecar.
#[derive(Parser, Debug)]
#[command(name = "news-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A date-windowed search crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present_any = ["stats", "merge"])]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// First day to search (YYYY-MM-DD), overrides the config file
    #[arg(long, value_name = "DATE")]
    from: Option<NaiveDate>,

    /// Last day to search (YYYY-MM-DD), overrides the config file
    #[arg(long, value_name = "DATE")]
    to: Option<NaiveDate>,

    /// Folder for the report files, overrides the config file
    #[arg(long, value_name = "DIR")]
    output_folder: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Validate config and show what would be searched without searching
    #[arg(long, conflicts_with_all = ["stats", "merge"])]
    dry_run: bool,

    /// Print statistics of an existing report CSV and exit
    #[arg(long, value_name = "CSV", conflicts_with_all = ["dry_run", "merge"])]
    stats: Option<PathBuf>,

    /// Merge several report CSVs into one and exit
    #[arg(long, value_name = "CSV", num_args = 1.., requires = "merge_output")]
    merge: Vec<PathBuf>,

    /// Destination of --merge
    #[arg(long, value_name = "CSV")]
    merge_output: Option<PathBuf>,

    /// Column to sort merged rows by
    #[arg(long, value_name = "COLUMN", requires = "merge")]
    sort_by: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Handle the report-only modes first; they need no configuration
    if let Some(path) = &cli.stats {
        return handle_stats(path);
    }
    if !cli.merge.is_empty() {
        return handle_merge(&cli);
    }

    let Some(config_path) = &cli.config else {
        bail!("a configuration file is required");
    };

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", config_path.display());
    let (mut config, config_hash) = load_config_with_hash(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config, config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("news_sweep=info,warn"),
            1 => EnvFilter::new("news_sweep=debug,info"),
            2 => EnvFilter::new("news_sweep=trace,debug"),
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
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(from) = cli.from {
        config.dates.from = from;
    }
    if let Some(to) = cli.to {
        config.dates.to = to;
    }
    if let Some(folder) = &cli.output_folder {
        config.output.folder = folder.display().to_string();
    }
    if cli.headed {
        config.browser.headless = false;
    }

    validate(config).context("invalid command-line override")?;
    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be searched
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== News-Sweep Dry Run ===\n");

    let window = DateWindow::new(config.dates.from, config.dates.to)?;

    println!("Search:");
    println!("  Engine: {}", config.search.base_url);
    println!("  Required keywords: {:?}", config.search.required_keywords);
    println!("  Optional keywords: {:?}", config.search.optional_keywords);
    println!("  Max pages per day: {}", config.search.max_pages);
    println!("  Max attempts per day: {}", config.search.max_attempts);

    println!("\nContent keywords ({}):", config.content.keywords.len());
    for keyword in &config.content.keywords {
        println!("  - {}", keyword);
    }

    println!("\nDates:");
    println!(
        "  {} to {} ({} days)",
        window.from(),
        window.to(),
        window.len_days()
    );

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    println!("  Page load timeout: {}s", config.browser.page_load_timeout);

    println!("\nOutput:");
    println!("  Folder: {}", config.output.folder);

    let first_day = DateWindow::single_day(window.from());
    let query = SearchQuery::new(
        config.search.required_keywords.clone(),
        config.search.optional_keywords.clone(),
        first_day,
    );
    println!("\nFirst query:");
    println!("  {}", query.to_url(&config.search.base_url));

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --stats mode: summarizes an existing report
fn handle_stats(path: &Path) -> anyhow::Result<()> {
    println!("Report: {}\n", path.display());

    let report =
        read_report(path).with_context(|| format!("failed to read {}", path.display()))?;
    print_statistics(&summarize_report(&report));

    Ok(())
}

/// Handles the --merge mode: joins reports into one CSV
fn handle_merge(cli: &Cli) -> anyhow::Result<()> {
    let Some(output) = &cli.merge_output else {
        bail!("--merge requires --merge-output");
    };

    let rows = merge_reports(&cli.merge, output, cli.sort_by.as_deref())
        .context("failed to merge reports")?;
    println!(
        "✓ Merged {} reports ({} rows) into {}",
        cli.merge.len(),
        rows,
        output.display()
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        "Searching {} to {} for {:?}",
        config.dates.from,
        config.dates.to,
        config.search.required_keywords
    );

    // Ctrl-C cuts the current wait short; completed days are still written
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Shutdown requested, finishing up");
            trigger.cancel();
        }
    });

    match crawl(config, Some(config_hash), cancel).await {
        Ok(paths) => {
            tracing::info!("Crawl completed successfully");
            println!("✓ Report written to: {}", paths.csv.display());
            println!("✓ Metadata written to: {}", paths.metadata.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
