//! Match submission validator

use crate::config::RatingConfig;
use crate::error::ValidationError;
use crate::types::{MatchInput, MatchResult, PlayerId, Side};
use std::collections::HashSet;

/// Highest score a side can be credited with in one match or game
pub const MAX_SCORE: u32 = 99;

/// Checks raw submissions; rules run in order and the first failure wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchValidator {
    min_winning_score: Option<u32>,
}

impl MatchValidator {
    /// Validator for rated matches, enforcing the configured winning score
    pub fn for_ratings(config: &RatingConfig) -> Self {
        Self {
            min_winning_score: Some(config.min_winning_score),
        }
    }

    /// Validator for tournament games, which have no minimum winning score
    pub fn for_tournaments() -> Self {
        Self {
            min_winning_score: None,
        }
    }

    pub fn validate(&self, input: &MatchInput) -> Result<MatchResult, ValidationError> {
        let (team1, team2, raw1, raw2) = require_complete(input)?;

        let distinct: HashSet<PlayerId> = team1.iter().chain(team2.iter()).copied().collect();
        if distinct.len() != 4 {
            return Err(ValidationError::DuplicatePlayers);
        }

        let team1_score = parse_score(raw1)?;
        let team2_score = parse_score(raw2)?;
        if team1_score == team2_score {
            return Err(ValidationError::TiedScore { score: team1_score });
        }

        let winning_score = team1_score.max(team2_score);
        if let Some(minimum) = self.min_winning_score {
            if winning_score < minimum {
                return Err(ValidationError::WinningScoreTooLow {
                    score: winning_score,
                    minimum,
                });
            }
        }

        let winner = if team1_score > team2_score {
            Side::Team1
        } else {
            Side::Team2
        };

        Ok(MatchResult {
            team1,
            team2,
            team1_score,
            team2_score,
            winner,
        })
    }
}

type CompleteInput<'a> = ([PlayerId; 2], [PlayerId; 2], &'a str, &'a str);

fn require_complete(input: &MatchInput) -> Result<CompleteInput<'_>, ValidationError> {
    Ok((
        [slot(input.team1[0])?, slot(input.team1[1])?],
        [slot(input.team2[0])?, slot(input.team2[1])?],
        raw_score(&input.team1_score)?,
        raw_score(&input.team2_score)?,
    ))
}

fn slot(value: Option<PlayerId>) -> Result<PlayerId, ValidationError> {
    value.ok_or(ValidationError::IncompleteSubmission)
}

fn raw_score(value: &Option<String>) -> Result<&str, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Ok(raw),
        _ => Err(ValidationError::IncompleteSubmission),
    }
}

fn parse_score(raw: &str) -> Result<u32, ValidationError> {
    let score = raw.parse::<u32>().map_err(|_| ValidationError::InvalidScore {
        value: raw.to_string(),
    })?;
    if score > MAX_SCORE {
        return Err(ValidationError::ScoreOutOfRange {
            score,
            maximum: MAX_SCORE,
        });
    }
    Ok(score)
}
