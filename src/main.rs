use std::collections::HashMap;
use std::path::{Path, PathBuf};

use analytics::MetricsEngine;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use core_types::PerformanceRecord;
// Import database types directly from the database crate
use database::connection::{connect, run_migrations};
use database::repository::DbRepository;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use loader::SeriesSource;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// The main entry point for the fundpipe application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (DATABASE_URL) from a .env file, if present.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse command-line arguments and execute the appropriate command
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => handle_run(args).await,
        Commands::Report(args) => handle_report(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A batch pipeline that computes and stores monthly fund performance metrics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the source files, compute metrics for every fund, and store them.
    Run(RunArgs),

    /// Display the stored performance series for one fund.
    Report(ReportArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Path to the pipeline configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[derive(Parser)]
struct ReportArgs {
    /// The fund to report on.
    #[arg(long)]
    fund_id: i32,
}

// ==============================================================================
// Run Command Logic
// ==============================================================================

/// Orchestrates the three pipeline phases in order: load fully, compute
/// fully, store fully. A failure in any phase abandons the run; nothing is
/// resumed mid-way.
async fn handle_run(args: RunArgs) -> anyhow::Result<()> {
    let config = configuration::load_config(&args.config)?;

    // --- Phase 1: load ---
    let metadata = loader::load_metadata(Path::new(&config.sources.metadata_file))?;
    let sources = config
        .sources
        .funds
        .iter()
        .map(|fund| {
            Ok(SeriesSource {
                fund_id: fund.fund_id,
                path: PathBuf::from(&fund.path),
                format: fund.format.parse()?,
            })
        })
        .collect::<Result<Vec<_>, loader::LoaderError>>()?;
    let observations = loader::load_observations(&sources)?;

    // --- Phase 2: compute ---
    // A fund's metadata may declare its own initial price; otherwise the
    // config-wide nominal price applies.
    let initial_prices: HashMap<i32, Decimal> = metadata
        .iter()
        .map(|fund| (fund.fund_id, fund.initial_price))
        .collect();

    // Engine state never crosses fund boundaries, so each fund's reduction
    // runs as its own task.
    let tasks: Vec<_> = observations
        .into_iter()
        .map(|(fund_id, series)| {
            let initial_price = initial_prices
                .get(&fund_id)
                .copied()
                .unwrap_or(config.pipeline.initial_price);

            tokio::spawn(async move {
                let engine = MetricsEngine::new(initial_price);
                engine.compute_fund(&series)
            })
        })
        .collect();

    let mut per_fund_records: Vec<Vec<PerformanceRecord>> = Vec::with_capacity(tasks.len());
    for task in join_all(tasks).await {
        per_fund_records.push(task??);
    }

    // --- Phase 3: store ---
    let pool = connect().await?;
    run_migrations(&pool).await?;
    let repository = DbRepository::new(pool);

    repository.save_fund_metadata(&metadata).await?;

    let progress = ProgressBar::new(per_fund_records.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut stored = 0usize;
    for records in &per_fund_records {
        if let Some(first) = records.first() {
            progress.set_message(format!("Storing fund {}...", first.fund_id));
        }
        repository.save_performance_records(records).await?;
        stored += records.len();
        progress.inc(1);
    }
    progress.finish_with_message("Pipeline complete!");

    tracing::info!(
        funds = per_fund_records.len(),
        records = stored,
        "Stored performance metrics"
    );
    Ok(())
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Fetches the stored series for one fund and renders it as a table.
async fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let pool = connect().await?;
    let repository = DbRepository::new(pool);

    let records = repository.get_performance_for_fund(args.fund_id).await?;

    let mut table = Table::new();
    table.set_header([
        "Year",
        "Month",
        "Price Per Share",
        "Dividend Per Share",
        "Base Monthly (%)",
        "LTD (%)",
        "YTD (%)",
    ]);
    for record in &records {
        table.add_row([
            record.year.to_string(),
            format!("{:02}", record.month),
            record.price_per_share.to_string(),
            record.dividend_per_share.to_string(),
            record.base_monthly_return_pct.to_string(),
            record.ltd_return_pct.to_string(),
            record.ytd_return_pct.to_string(),
        ]);
    }

    println!("Performance metrics for fund {}:", args.fund_id);
    println!("{table}");
    Ok(())
}
