//! # Faceoff Analyzer
//!
//! Attributes every faceoff in a game's play-by-play feed to the offensive or
//! defensive zone of the team that won it, and folds per-game counts into a
//! league-wide offensive-zone faceoff win ratio.
//!
//! The only inputs are the rink coordinates of each faceoff, the period number
//! and the side of the rink the home team defended in the first period. Sides
//! swap every period, so period parity decides whether the first-period
//! assignment still holds.

pub mod analyzer;
pub mod error;
pub mod models;


pub use analyzer::{
    analyze_game, analyze_season, is_offensive_won, GameSummary, SeasonAggregate, SeasonReport,
    SkippedGame,
};
pub use error::AnalysisError;
pub use models::{Faceoff, GameFeed, PlayRecord, RinkSide, FACEOFF_EVENT};
