//! Sequential game feed ingestion.
//!
//! Feeds are fetched strictly in schedule order with one request in flight.
//! Each fetch resolves to a [`Step`]: the feed is accepted, ingestion stops
//! quietly at the first unplayed game, or it aborts on a failed fetch. Feeds
//! accepted before a stop or an abort are always returned to the caller.

use chrono::NaiveDate;
use faceoff_analyzer::GameFeed;
use tracing::{error, info, warn};

use crate::error::IngestError;
use crate::schedule::{feed_game_date, is_played, FeedLocation};
use crate::transport::{fetch_json, Transport};

/// How ingestion ended
#[derive(Debug)]
pub enum IngestStatus {
    /// Every location was fetched
    Completed,

    /// A game not yet played was reached; later locations were not fetched
    StoppedEarly { game_id: u64, game_date: NaiveDate },

    /// A fetch failed; later locations were not fetched
    Aborted(IngestError),
}

impl IngestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            IngestStatus::Completed => "completed",
            IngestStatus::StoppedEarly { .. } => "stopped_early",
            IngestStatus::Aborted(_) => "aborted",
        }
    }
}

/// Feeds fetched so far plus how ingestion ended
#[derive(Debug)]
pub struct Ingestion {
    /// Accepted feeds, in fetch order
    pub feeds: Vec<GameFeed>,
    pub status: IngestStatus,
    pub last_attempted: Option<u64>,
}

enum Step {
    Accept(GameFeed),
    SoftStop(NaiveDate),
    Abort(IngestError),
}

async fn fetch_step(transport: &dyn Transport, location: &FeedLocation, today: NaiveDate) -> Step {
    let feed: GameFeed = match fetch_json(transport, &location.url).await {
        Ok(feed) => feed,
        Err(source) => return Step::Abort(IngestError { game_id: location.game_id, source }),
    };

    // The schedule can be stale; trust the date the feed itself carries
    let game_date = feed_game_date(&feed).unwrap_or(location.scheduled);
    if !is_played(game_date, today) {
        return Step::SoftStop(game_date);
    }

    Step::Accept(feed)
}

/// Fetch every location in order, one at a time
pub async fn ingest_feeds(
    transport: &dyn Transport,
    locations: &[FeedLocation],
    today: NaiveDate,
) -> Ingestion {
    let total = locations.len();
    let mut feeds = Vec::with_capacity(total);
    let mut last_attempted = None;

    for (index, location) in locations.iter().enumerate() {
        last_attempted = Some(location.game_id);

        let status = match fetch_step(transport, location, today).await {
            Step::Accept(feed) => {
                info!("Fetched game {} ({} / {})", location.game_id, index + 1, total);
                feeds.push(feed);
                continue;
            }
            Step::SoftStop(game_date) => {
                warn!(
                    "Game {} is scheduled for {}, not played yet; all available games fetched",
                    location.game_id, game_date
                );
                IngestStatus::StoppedEarly { game_id: location.game_id, game_date }
            }
            Step::Abort(e) => {
                error!("{}: {}", e, e.source);
                error!("Last attempted GameID: {}", location.game_id);
                IngestStatus::Aborted(e)
            }
        };

        return Ingestion { feeds, status, last_attempted };
    }

    info!("All {} available games fetched successfully", feeds.len());
    Ingestion { feeds, status: IngestStatus::Completed, last_attempted }
}
