use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Event type id the provider uses for faceoffs
pub const FACEOFF_EVENT: &str = "FACEOFF";

/// One game's live feed as returned by the stats provider.
///
/// Only the fields the analyzer reads are modelled; everything else in the
/// document is ignored during deserialization.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFeed {
    pub game_pk: u64,
    pub game_data: GameData,
    pub live_data: LiveData,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameData {
    #[serde(default)]
    pub datetime: Option<GameDateTime>,
    pub teams: GameTeams,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDateTime {
    /// Scheduled start, UTC
    pub date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameTeams {
    pub home: TeamInfo,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub tri_code: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LiveData {
    pub linescore: Linescore,
    pub plays: Plays,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Linescore {
    #[serde(default)]
    pub periods: Vec<PeriodLinescore>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PeriodLinescore {
    pub home: PeriodSide,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSide {
    #[serde(default)]
    pub rink_side: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plays {
    #[serde(default)]
    pub all_plays: Vec<PlayRecord>,
}

/// A single play-by-play event
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayRecord {
    pub result: PlayResult,
    pub about: PlayAbout,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub team: Option<TeamInfo>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResult {
    pub event_type_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayAbout {
    pub period: u32,
}

/// Rink coordinates, normalized so that x = 0 is the center ice line
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Coordinates {
    #[serde(default)]
    pub x: Option<f64>,
}

/// Half of the rink a team defends during a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RinkSide {
    Left,
    Right,
}

impl RinkSide {
    /// Parse the provider's `rinkSide` value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(RinkSide::Left),
            "right" => Some(RinkSide::Right),
            _ => None,
        }
    }
}

/// A faceoff with everything needed to attribute it to a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Faceoff<'a> {
    pub period: u32,
    pub x: f64,
    pub winner: &'a str,
}

impl GameFeed {
    /// Tri-code of the home team
    pub fn home_tri_code(&self) -> &str {
        &self.game_data.teams.home.tri_code
    }

    /// Scheduled start time embedded in the feed, if the provider sent one
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.game_data.datetime.as_ref().map(|dt| dt.date_time)
    }

    /// Side of the rink the home team defended in period 1
    pub fn home_starting_side(&self) -> Result<RinkSide, AnalysisError> {
        let period_one = self
            .live_data
            .linescore
            .periods
            .first()
            .ok_or(AnalysisError::MissingPeriodOne { game_id: self.game_pk })?;

        let raw = period_one.home.rink_side.as_deref();
        raw.and_then(RinkSide::parse).ok_or_else(|| AnalysisError::UnknownRinkSide {
            game_id: self.game_pk,
            found: raw.map(str::to_string),
        })
    }

    /// All plays whose event type is a faceoff, in feed order
    pub fn faceoff_plays(&self) -> impl Iterator<Item = &PlayRecord> {
        self.live_data.plays.all_plays.iter().filter(|play| play.is_faceoff())
    }
}

impl PlayRecord {
    pub fn is_faceoff(&self) -> bool {
        self.result.event_type_id == FACEOFF_EVENT
    }

    /// View this play as a faceoff.
    ///
    /// Returns `None` for non-faceoff plays and for faceoffs missing a finite
    /// x-coordinate or a winning team, since those cannot be attributed.
    pub fn as_faceoff(&self) -> Option<Faceoff<'_>> {
        if !self.is_faceoff() {
            return None;
        }
        let x = self.coordinates.x.filter(|x| x.is_finite())?;
        let winner = self.team.as_ref()?.tri_code.as_str();
        Some(Faceoff { period: self.about.period, x, winner })
    }
}
