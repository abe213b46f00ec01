use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use faceoff_analyzer::analyze_season;
use tracing::info;

use crate::config::FetcherConfig;
use crate::error::ScheduleFetchError;
use crate::ingest::{ingest_feeds, Ingestion};
use crate::report::SeasonRun;
use crate::schedule::{resolve_schedule, FeedLocation};
use crate::transport::{HttpTransport, Transport};

/// Drives schedule resolution, feed ingestion and analysis for one season
pub struct SeasonFetcher {
    config: FetcherConfig,
    transport: Arc<dyn Transport>,
}

impl SeasonFetcher {
    /// Create a new fetcher backed by an HTTP client
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.http)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: FetcherConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Feed locations of every game played before `today`
    pub async fn resolve_schedule(
        &self,
        season: &str,
        today: NaiveDate,
    ) -> Result<Vec<FeedLocation>, ScheduleFetchError> {
        resolve_schedule(self.transport.as_ref(), &self.config.provider, season, today).await
    }

    /// Fetch the feeds one at a time, in order
    pub async fn ingest(&self, locations: &[FeedLocation], today: NaiveDate) -> Ingestion {
        ingest_feeds(self.transport.as_ref(), locations, today).await
    }

    /// Run a complete schedule, ingest and analyze cycle.
    ///
    /// Only a schedule failure is an error here; a failed game fetch still
    /// yields a run over the feeds fetched before it.
    pub async fn run_season(
        &self,
        season: &str,
        today: NaiveDate,
    ) -> Result<SeasonRun, ScheduleFetchError> {
        info!("Starting faceoff analysis for season {}", season);

        let locations = self.resolve_schedule(season, today).await?;
        let ingestion = self.ingest(&locations, today).await;
        let report = analyze_season(&ingestion.feeds);

        Ok(SeasonRun { season: season.to_string(), ingestion, report })
    }
}
