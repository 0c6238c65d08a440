//! Rating system configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a deleted match's rating effect is undone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReversalStrategy {
    /// Subtract the deltas recorded on the match when it was applied
    #[default]
    StoredDelta,
    /// Recompute deltas from the players' current ratings.
    /// Only exact when matches are deleted newest-first per player.
    Reconstruct,
}

impl FromStr for ReversalStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stored_delta" | "stored" => Ok(ReversalStrategy::StoredDelta),
            "reconstruct" => Ok(ReversalStrategy::Reconstruct),
            other => Err(anyhow::anyhow!("Unknown reversal strategy: {}", other)),
        }
    }
}

/// Elo engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating given to newly added players
    pub initial_rating: i32,
    pub k_factor: f64,
    /// Fraction added to the multiplier per game of score difference
    pub margin_step: f64,
    /// Minimum games the winning side must reach for a complete match
    pub min_winning_score: u32,
    pub reversal: ReversalStrategy,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1000,
            k_factor: 40.0,
            margin_step: 0.10,
            min_winning_score: 4,
            reversal: ReversalStrategy::StoredDelta,
        }
    }
}
