//! Season run results and process exit codes

use faceoff_analyzer::{AnalysisError, SeasonReport};
use serde::Serialize;

use crate::ingest::{IngestStatus, Ingestion};

pub const EXIT_OK: u8 = 0;
pub const EXIT_SCHEDULE_FAILURE: u8 = 1;
pub const EXIT_NO_DATA: u8 = 2;
pub const EXIT_INGEST_ABORTED: u8 = 3;

/// Outcome of one season run
#[derive(Debug)]
pub struct SeasonRun {
    pub season: String,
    pub ingestion: Ingestion,
    pub report: SeasonReport,
}

/// Serializable view of a [`SeasonRun`]
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub season: &'a str,
    pub status: &'static str,
    pub games_fetched: usize,
    pub last_attempted: Option<u64>,
    pub error: Option<String>,
    pub ratio: Option<f64>,
    pub report: &'a SeasonReport,
}

impl SeasonRun {
    pub fn ratio(&self) -> Result<f64, AnalysisError> {
        self.report.ratio()
    }

    /// A failed game fetch takes precedence over an empty result
    pub fn exit_code(&self) -> u8 {
        match (&self.ingestion.status, self.ratio()) {
            (IngestStatus::Aborted(_), _) => EXIT_INGEST_ABORTED,
            (_, Err(_)) => EXIT_NO_DATA,
            (_, Ok(_)) => EXIT_OK,
        }
    }

    pub fn summary(&self) -> RunSummary<'_> {
        let error = match &self.ingestion.status {
            IngestStatus::Aborted(e) => Some(format!("{}: {}", e, e.source)),
            _ => None,
        };

        RunSummary {
            season: &self.season,
            status: self.ingestion.status.label(),
            games_fetched: self.ingestion.feeds.len(),
            last_attempted: self.ingestion.last_attempted,
            error,
            ratio: self.ratio().ok(),
            report: &self.report,
        }
    }
}
