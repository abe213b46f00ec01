//! Season Fetcher
//!
//! Fetches an NHL season schedule and the play-by-play feed of every game
//! already played, one feed at a time, and hands the feeds to the faceoff
//! analyzer to compute the offensive-zone faceoff win ratio.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod ingest;
pub mod report;
pub mod schedule;
pub mod transport;

#[cfg(test)]
mod tests;

pub use config::FetcherConfig;
pub use error::{FetchError, IngestError, ScheduleFetchError};
pub use fetcher::SeasonFetcher;
pub use ingest::{ingest_feeds, IngestStatus, Ingestion};
pub use report::{RunSummary, SeasonRun};
pub use schedule::{is_played, played_game_locations, resolve_schedule, FeedLocation, ScheduleEntry};
pub use transport::{FetchResponse, HttpTransport, Transport, TransportError};
