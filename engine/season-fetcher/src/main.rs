use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use season_fetcher::report::EXIT_SCHEDULE_FAILURE;
use season_fetcher::{FetcherConfig, IngestStatus, SeasonFetcher};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Offensive-zone faceoff win ratio for an NHL season
#[derive(Parser)]
#[command(name = "faceoff-ratio")]
#[command(about = "Reports the offensive-zone faceoff win ratio of an NHL season")]
struct Cli {
    /// Season token, e.g. 20172018
    season: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the season report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_SCHEDULE_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let config = match &cli.config {
        Some(path) => FetcherConfig::from_file(path)?,
        None => FetcherConfig::from_env()?,
    };
    info!("Loaded configuration: {:?}", config);

    let fetcher = SeasonFetcher::new(config)?;
    let today = Utc::now().date_naive();

    let run = fetcher.run_season(&cli.season, today).await.context("Schedule unavailable")?;

    if let IngestStatus::Aborted(e) = &run.ingestion.status {
        warn!(
            "Ingestion aborted at game {}; analyzing {} games fetched before it",
            e.game_id,
            run.ingestion.feeds.len()
        );
    }

    if cli.json {
        let output =
            serde_json::to_string_pretty(&run.summary()).context("Failed to serialize report")?;
        println!("{output}");
    } else {
        match run.ratio() {
            Ok(ratio) => println!("Offensive faceoff win ratio: {ratio}"),
            Err(e) => println!("Offensive faceoff win ratio unavailable: {e}"),
        }
        for skipped in &run.report.skipped {
            println!("Skipped game {}: {}", skipped.game_id, skipped.reason);
        }
    }

    Ok(run.exit_code())
}
