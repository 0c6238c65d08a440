//! Cumulative points configuration

use serde::{Deserialize, Serialize};

/// Bonuses used by the tournament standings calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    /// Added to every member of the winning side of a game
    pub win_bonus: u32,
    /// Added once to the player marked as tournament winner
    pub tournament_bonus: u32,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            win_bonus: 2,
            tournament_bonus: 5,
        }
    }
}
