//! Bracket engine error types.

use thiserror::Error;

use super::models::{MatchId, UserId};

/// Bracket engine errors
#[derive(Debug, Error)]
pub enum BracketError {
    /// Tournament size outside the supported range
    #[error("Invalid tournament size {0}: must be between {min} and {max}", min = super::MIN_SIZE, max = super::MAX_SIZE)]
    InvalidSize(usize),

    /// Tournament name already in use within the guild
    #[error("A tournament named '{0}' already exists in this guild")]
    NameTaken(String),

    /// Tournament not found for the given guild and name
    #[error("Tournament '{0}' not found")]
    TournamentNotFound(String),

    /// Tournament has reached its declared size
    #[error("Tournament is full: {size} participants registered")]
    TournamentFull { size: usize },

    /// User is already registered
    #[error("User {0} is already registered")]
    AlreadyRegistered(UserId),

    /// Participant not found
    #[error("User {0} is not registered in this tournament")]
    ParticipantNotFound(UserId),

    /// Operation requires the tournament to not have started yet
    #[error("Tournament has already started")]
    AlreadyStarted,

    /// Operation requires the tournament to have started
    #[error("Tournament has not started yet")]
    NotStarted,

    /// Tournament has already finished
    #[error("Tournament is already completed")]
    AlreadyCompleted,

    /// Not enough participants to start
    #[error("Insufficient participants: need {needed}, have {current}")]
    InsufficientParticipants { needed: usize, current: usize },

    /// Match not found in this tournament
    #[error("Match {0} not found")]
    MatchNotFound(MatchId),

    /// Match result already recorded
    #[error("Match {0} has already been scored")]
    MatchAlreadyScored(MatchId),

    /// Match does not have both participants assigned yet
    #[error("Match {0} is not ready to be played")]
    MatchNotReady(MatchId),

    /// Reported winner is not one of the match's participants
    #[error("User {user_id} is not playing in match {match_id}")]
    NotInMatch { match_id: MatchId, user_id: UserId },

    /// Storage error surfaced through the manager
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
