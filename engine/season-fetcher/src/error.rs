//! Error types for the season fetcher

use thiserror::Error;

use crate::transport::TransportError;

/// Failure to retrieve or decode a single provider document
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The season schedule could not be retrieved; nothing can be ingested
#[derive(Error, Debug)]
#[error("Failed to get schedule for season {season}")]
pub struct ScheduleFetchError {
    pub season: String,
    #[source]
    pub source: FetchError,
}

/// A game feed fetch failed and ingestion stopped at that game
#[derive(Error, Debug)]
#[error("Failed to fetch feed for game {game_id}")]
pub struct IngestError {
    /// Last attempted game id
    pub game_id: u64,
    #[source]
    pub source: FetchError,
}
