//! Margin-scaled Elo calculation
//!
//! A doubles match is rated as team versus team: each pair is represented by
//! the mean of its two members' ratings, and every participant moves by the
//! same amount.

use crate::config::RatingConfig;
use crate::error::IntegrityError;
use crate::types::{MatchResult, Player, PlayerId, Side};
use serde::{Deserialize, Serialize};

/// Mean pre-match rating of each side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamAverages {
    pub team1: f64,
    pub team2: f64,
}

impl TeamAverages {
    /// Read both averages from the roster in one pass, before anything is mutated
    pub fn capture(players: &[Player], result: &MatchResult) -> Result<Self, IntegrityError> {
        Ok(Self {
            team1: team_average(players, &result.team1)?,
            team2: team_average(players, &result.team2)?,
        })
    }

    pub fn of(&self, side: Side) -> f64 {
        match side {
            Side::Team1 => self.team1,
            Side::Team2 => self.team2,
        }
    }
}

fn team_average(players: &[Player], team: &[PlayerId; 2]) -> Result<f64, IntegrityError> {
    let mut total = 0.0;
    for player_id in team {
        let player = players
            .iter()
            .find(|p| &p.id == player_id)
            .ok_or(IntegrityError::UnknownPlayer {
                player_id: *player_id,
            })?;
        total += f64::from(player.rating);
    }
    Ok(total / team.len() as f64)
}

/// Elo with a fixed K-factor and a linear score-margin multiplier
#[derive(Debug, Clone, PartialEq)]
pub struct EloCalculator {
    k_factor: f64,
    margin_step: f64,
}

impl EloCalculator {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            k_factor: config.k_factor,
            margin_step: config.margin_step,
        }
    }

    /// Probability that a side rated `rating` beats a side rated `opponent`
    pub fn expected_score(rating: f64, opponent: f64) -> f64 {
        1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
    }

    /// Points the winner gains (and the loser drops) before margin scaling
    pub fn calculate_rating_change(&self, winner_rating: f64, loser_rating: f64) -> i32 {
        let expected_win = Self::expected_score(winner_rating, loser_rating);
        (self.k_factor * (1.0 - expected_win)).round() as i32
    }

    pub fn margin_multiplier(&self, score_difference: u32) -> f64 {
        1.0 + self.margin_step * f64::from(score_difference)
    }

    /// Unsigned change every participant of `result` receives given `averages`
    pub fn final_change(&self, result: &MatchResult, averages: &TeamAverages) -> i32 {
        let winner = result.winner;
        let base =
            self.calculate_rating_change(averages.of(winner), averages.of(winner.opponent()));
        let multiplier = self.margin_multiplier(result.score_difference());
        (f64::from(base) * multiplier).round() as i32
    }
}

impl Default for EloCalculator {
    fn default() -> Self {
        Self::new(&RatingConfig::default())
    }
}
