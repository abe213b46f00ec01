//! Faceoff zone attribution and season aggregation

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::models::{Faceoff, GameFeed, RinkSide};

/// Decide whether a faceoff was won by the team attacking in that zone.
///
/// Center ice faceoffs have no zone, so they count as offensive-won exactly
/// when the home team wins them.
pub fn is_offensive_won(
    faceoff: &Faceoff<'_>,
    home_tri_code: &str,
    home_starts_on_left: bool,
) -> bool {
    let home_won = faceoff.winner == home_tri_code;

    if faceoff.x == 0.0 {
        return home_won;
    }

    let side_flag = home_won != home_starts_on_left;
    let odd_period = faceoff.period % 2 == 1;
    let left_half = faceoff.x < 0.0;

    // Teams swap ends every period: even periods invert the period 1 mapping
    if odd_period == left_half {
        side_flag
    } else {
        !side_flag
    }
}

/// Faceoff counts for a single game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub game_id: u64,
    pub home_team: String,
    pub offensive_wins: u64,
    pub faceoffs: u64,
    /// Faceoffs without coordinates or a winner, counted in `faceoffs` as not offensive-won
    pub unclassified: u64,
}

/// Analyze one game feed
pub fn analyze_game(feed: &GameFeed) -> Result<GameSummary, AnalysisError> {
    let home = feed.home_tri_code();
    let home_starts_on_left = feed.home_starting_side()? == RinkSide::Left;

    let mut summary = GameSummary {
        game_id: feed.game_pk,
        home_team: home.to_string(),
        offensive_wins: 0,
        faceoffs: 0,
        unclassified: 0,
    };

    for play in feed.faceoff_plays() {
        summary.faceoffs += 1;
        match play.as_faceoff() {
            Some(faceoff) if is_offensive_won(&faceoff, home, home_starts_on_left) => {
                summary.offensive_wins += 1;
            }
            Some(_) => {}
            None => summary.unclassified += 1,
        }
    }

    if summary.unclassified > 0 {
        debug!(
            "Game {}: {} faceoffs without coordinates or winner",
            summary.game_id, summary.unclassified
        );
    }

    Ok(summary)
}

/// Running league totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeasonAggregate {
    pub offensive_wins: u64,
    pub total_faceoffs: u64,
}

impl SeasonAggregate {
    /// Fold one game into the totals
    pub fn add(&mut self, game: &GameSummary) {
        self.offensive_wins += game.offensive_wins;
        self.total_faceoffs += game.faceoffs;
    }

    /// Fraction of faceoffs won in the offensive zone
    pub fn ratio(&self) -> Result<f64, AnalysisError> {
        if self.total_faceoffs == 0 {
            return Err(AnalysisError::NoData);
        }
        Ok(self.offensive_wins as f64 / self.total_faceoffs as f64)
    }
}

/// A game left out of the totals and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedGame {
    pub game_id: u64,
    pub reason: String,
}

/// Per-game breakdown plus league totals
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeasonReport {
    pub games: Vec<GameSummary>,
    pub skipped: Vec<SkippedGame>,
    pub aggregate: SeasonAggregate,
}

impl SeasonReport {
    pub fn ratio(&self) -> Result<f64, AnalysisError> {
        self.aggregate.ratio()
    }
}

/// Analyze every feed and fold the results into league totals.
///
/// A game whose starting rink side cannot be determined is reported in
/// `skipped` and does not contribute to the totals.
pub fn analyze_season(feeds: &[GameFeed]) -> SeasonReport {
    let mut report = SeasonReport::default();

    for feed in feeds {
        match analyze_game(feed) {
            Ok(summary) => {
                report.aggregate.add(&summary);
                report.games.push(summary);
            }
            Err(e) => {
                warn!("Skipping game {}: {}", feed.game_pk, e);
                report.skipped.push(SkippedGame { game_id: feed.game_pk, reason: e.to_string() });
            }
        }
    }

    report
}
