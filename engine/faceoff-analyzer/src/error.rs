//! Error types for the faceoff analyzer

use thiserror::Error;

/// Errors that can occur while analyzing game feeds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// No faceoffs were found across the analyzed games, so the ratio is undefined
    #[error("No faceoffs found in the analyzed games; ratio is undefined")]
    NoData,

    #[error("Game {game_id} has no period 1 linescore")]
    MissingPeriodOne { game_id: u64 },

    #[error("Game {game_id} has unknown home rink side {found:?} for period 1")]
    UnknownRinkSide { game_id: u64, found: Option<String> },
}
