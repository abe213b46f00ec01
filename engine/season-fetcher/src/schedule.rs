//! Season schedule resolution

use chrono::{FixedOffset, NaiveDate};
use faceoff_analyzer::GameFeed;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ProviderConfig;
use crate::error::ScheduleFetchError;
use crate::transport::{fetch_json, Transport};

/// One row of the provider's season schedule document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduleEntry {
    /// Game id
    pub id: u64,

    /// Eastern start time, e.g. "20171004 19:00:00"; the first 8 characters are the date
    pub est: String,
}

impl ScheduleEntry {
    /// Calendar date the game is scheduled for
    pub fn estimated_date(&self) -> Option<NaiveDate> {
        let digits = self.est.get(..8)?;
        NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
    }
}

/// Where to fetch one game's feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedLocation {
    pub game_id: u64,
    pub scheduled: NaiveDate,
    pub url: String,
}

/// A game counts as played once its scheduled date is strictly before today (UTC).
///
/// Both the schedule filter and the ingestion soft stop use this boundary.
pub fn is_played(game_date: NaiveDate, today: NaiveDate) -> bool {
    game_date < today
}

/// Offset of the schedule's `est` dates from UTC, in seconds west.
///
/// Games never start between midnight and 1 a.m. Eastern, so ignoring
/// daylight saving never moves a start across midnight.
const SCHEDULE_OFFSET_WEST_SECS: i32 = 5 * 3600;

/// Calendar date of the feed's own start time, on the schedule's clock.
///
/// A 10:30 p.m. Eastern start is the next day in UTC; converting back keeps
/// it on the same date the schedule lists it under.
pub fn feed_game_date(feed: &GameFeed) -> Option<NaiveDate> {
    let offset = FixedOffset::west_opt(SCHEDULE_OFFSET_WEST_SECS)?;
    feed.start_time().map(|start| start.with_timezone(&offset).date_naive())
}

/// Keep the played games, in schedule order, and turn them into feed locations
pub fn played_game_locations(
    entries: &[ScheduleEntry],
    today: NaiveDate,
    provider: &ProviderConfig,
) -> Vec<FeedLocation> {
    entries
        .iter()
        .filter_map(|entry| match entry.estimated_date() {
            Some(date) => Some((entry, date)),
            None => {
                warn!("Ignoring game {} with unreadable date {:?}", entry.id, entry.est);
                None
            }
        })
        .filter(|(_, date)| is_played(*date, today))
        .map(|(entry, date)| FeedLocation {
            game_id: entry.id,
            scheduled: date,
            url: provider.feed_url(entry.id),
        })
        .collect()
}

/// Fetch the season schedule and resolve the feeds of every game already played
pub async fn resolve_schedule(
    transport: &dyn Transport,
    provider: &ProviderConfig,
    season: &str,
    today: NaiveDate,
) -> Result<Vec<FeedLocation>, ScheduleFetchError> {
    let url = provider.schedule_url(season);
    info!("Fetching schedule for season {} from: {}", season, url);

    let entries: Vec<ScheduleEntry> = fetch_json(transport, &url)
        .await
        .map_err(|source| ScheduleFetchError { season: season.to_string(), source })?;

    let locations = played_game_locations(&entries, today, provider);
    info!(
        "Schedule for {} processed: {} games listed, {} played before {}",
        season,
        entries.len(),
        locations.len(),
        today
    );

    Ok(locations)
}
