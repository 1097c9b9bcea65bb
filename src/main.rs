// Parse arguments and configuration
// Set up logging
// Run the fetch with progress reporting
// Print the summary and write exports

use clap::Parser;
use solscan_history::{
    config::Config,
    export, parse_date,
    state::log_progress,
    Aggregator, DateRange, FetchRequest, FetchSettings, HistorySummary, SolscanClient,
};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "solscan-history", version, about = "Fetch and export Solana account history")]
struct Cli {
    /// Account address to fetch
    #[arg(long)]
    address: String,

    /// API key (defaults to SOLSCAN_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// First day to include, YYYY-MM-DD (UTC)
    #[arg(long)]
    start: Option<String>,

    /// Last day to include, YYYY-MM-DD (UTC, whole day)
    #[arg(long)]
    end: Option<String>,

    /// Row cap (defaults to MAX_ROWS or 20000)
    #[arg(long)]
    max_rows: Option<usize>,

    /// Write rows as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write rows as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    let start = cli.start.as_deref().map(parse_date).transpose()?;
    let end = cli.end.as_deref().map(parse_date).transpose()?;
    let request = FetchRequest {
        api_key: cli.api_key.or_else(|| config.api_key.clone()).unwrap_or_default(),
        address: cli.address,
        range: DateRange::from_dates(start, end)?,
        max_rows: cli.max_rows.unwrap_or(config.max_rows),
    };

    let client = SolscanClient::new(&config)?;
    let cancel = CancellationToken::new();
    let mut aggregator =
        Aggregator::new(client, FetchSettings::from(&config)).with_cancellation(cancel.clone());

    // Ctrl-C stops the crawl before the next request
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling fetch");
            ctrl_c_token.cancel();
        }
    });

    let progress_handle = tokio::spawn(log_progress(aggregator.subscribe()));

    let outcome = aggregator.fetch(&request).await.map(|_| ());
    if let Err(e) = progress_handle.await {
        warn!("Progress reporter stopped abnormally: {}", e);
    }

    let state = aggregator.state();
    if let Err(e) = &outcome {
        error!("Fetch failed: {}. Keeping {} partial rows", e, state.rows.len());
    }

    if let Some(account) = &state.account {
        println!(
            "Account type: {}  Balance: {} SOL",
            account.account_type().unwrap_or("unknown"),
            account
                .lamports()
                .map(|l| format!("{:.9}", export::lamports_to_sol(l)))
                .unwrap_or_else(|| "unknown".to_string())
        );
    }

    let summary = HistorySummary::from_rows(&state.rows);
    println!(
        "Rows: {}  Succeeded: {}  Failed: {}  Fees: {:.9} SOL",
        summary.total,
        summary.succeeded(),
        summary.failed,
        export::lamports_to_sol(summary.total_fee_lamports)
    );
    println!("{:<12} {:>8} {:>8} {:>14}", "day", "txs", "failed", "fees_sol");
    for (day, bucket) in &summary.daily {
        println!(
            "{:<12} {:>8} {:>8} {:>14.9}",
            day.to_string(),
            bucket.count,
            bucket.failed,
            export::lamports_to_sol(bucket.fee_lamports)
        );
    }

    if let Some(path) = &cli.csv {
        export::export_csv(&state.rows, path)?;
    }
    if let Some(path) = &cli.json {
        export::export_json(&state.rows, path)?;
    }

    outcome?;
    Ok(())
}
