//! Error types for the league engine
//!
//! Fallible operations return `anyhow::Result` like the rest of the crate; the
//! typed enums below are what callers downcast to when they need to tell a
//! rejected submission apart from a broken reference.

use crate::types::{GameId, MatchId, PlayerId, TournamentId};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// A proposed match or player was rejected before any state changed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill all fields: every player slot and both scores are required")]
    IncompleteSubmission,

    #[error("All players must be different")]
    DuplicatePlayers,

    #[error("Invalid score '{value}': scores must be non-negative whole numbers")]
    InvalidScore { value: String },

    #[error("Score {score} is out of range (at most {maximum})")]
    ScoreOutOfRange { score: u32, maximum: u32 },

    #[error("Matches cannot end in a tie ({score}-{score})")]
    TiedScore { score: u32 },

    #[error("Winner must score at least {minimum} games (got {score})")]
    WinningScoreTooLow { score: u32, minimum: u32 },

    #[error("Player name cannot be empty")]
    EmptyPlayerName,

    #[error("A player named '{name}' already exists")]
    DuplicatePlayerName { name: String },

    #[error("Tournament name cannot be empty")]
    EmptyTournamentName,
}

/// An operation would break a reference between stored records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("Player not found: {player_id}")]
    UnknownPlayer { player_id: PlayerId },

    #[error("Player {player_id} has recorded results and cannot be removed")]
    PlayerHasHistory { player_id: PlayerId },

    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: MatchId },

    #[error("Game not found: {game_id}")]
    GameNotFound { game_id: GameId },

    #[error("Tournament not found: {tournament_id}")]
    TournamentNotFound { tournament_id: TournamentId },

    #[error("Tournament {tournament_id} is already completed")]
    TournamentClosed { tournament_id: TournamentId },

    #[error("Rating or counters of player {player_id} would overflow")]
    StatsOverflow { player_id: PlayerId },
}

/// Top-level error for league operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeagueError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

impl LeagueError {
    pub fn configuration(message: impl Into<String>) -> Self {
        LeagueError::ConfigurationError {
            message: message.into(),
        }
    }


    /// Find the league error behind an `anyhow::Error`, if there is one
    pub fn classify(error: &anyhow::Error) -> Option<&LeagueError> {
        error.downcast_ref::<LeagueError>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_validation_messages_are_distinct() {
        let messages = [
            ValidationError::IncompleteSubmission.to_string(),
            ValidationError::DuplicatePlayers.to_string(),
            ValidationError::TiedScore { score: 4 }.to_string(),
            ValidationError::WinningScoreTooLow {
                score: 3,
                minimum: 4,
            }
            .to_string(),
        ];

        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert_eq!(messages[1], "All players must be different");
    }

    #[test]
    fn test_classify_through_anyhow() {
        let player_id = Uuid::new_v4();
        let err: anyhow::Error =
            LeagueError::from(IntegrityError::PlayerHasHistory { player_id }).into();

        assert_eq!(
            LeagueError::classify(&err),
            Some(&LeagueError::Integrity(IntegrityError::PlayerHasHistory {
                player_id
            }))
        );

        let other = anyhow::anyhow!("unrelated");
        assert!(LeagueError::classify(&other).is_none());
    }
}
