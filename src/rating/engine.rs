//! Apply and reverse a rated match
//!
//! The engine is stateless: it takes the current roster and returns a new one.
//! The caller owns persisting whatever comes back.

use crate::config::{RatingConfig, ReversalStrategy};
use crate::error::IntegrityError;
use crate::rating::calculator::{EloCalculator, TeamAverages};
use crate::types::{MatchRecord, MatchResult, Player, RatingDelta, Side};
use tracing::debug;

/// Roster after a match was applied, plus the signed change each participant got
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMatch {
    pub players: Vec<Player>,
    pub changes: Vec<RatingDelta>,
}

/// Team-average Elo engine
#[derive(Debug, Clone)]
pub struct RatingEngine {
    calculator: EloCalculator,
    reversal: ReversalStrategy,
}

impl RatingEngine {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            calculator: EloCalculator::new(config),
            reversal: config.reversal,
        }
    }

    /// Signed deltas `result` would cause given the roster's current ratings
    pub fn compute_deltas(
        &self,
        players: &[Player],
        result: &MatchResult,
    ) -> Result<Vec<RatingDelta>, IntegrityError> {
        let averages = TeamAverages::capture(players, result)?;
        let change = self.calculator.final_change(result, &averages);

        Ok(result
            .participants()
            .into_iter()
            .map(|player_id| {
                let won = result.side_of(&player_id) == Some(result.winner);
                RatingDelta {
                    player_id,
                    delta: if won { change } else { -change },
                }
            })
            .collect())
    }

    /// Apply a validated result; only the four participants change
    pub fn apply_match(
        &self,
        players: &[Player],
        result: &MatchResult,
    ) -> Result<AppliedMatch, IntegrityError> {
        let changes = self.compute_deltas(players, result)?;

        let players = players
            .iter()
            .map(|player| match result.side_of(&player.id) {
                Some(side) => credit(player, result, side, delta_for(&changes, player)),
                None => Ok(player.clone()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Applied {}-{} result, {} wins {} per player",
            result.team1_score,
            result.team2_score,
            result.winner,
            changes.first().map(|c| c.delta.abs()).unwrap_or_default()
        );

        Ok(AppliedMatch { players, changes })
    }

    /// Undo a stored match's effect on its participants.
    ///
    /// With [`ReversalStrategy::StoredDelta`] the deltas recorded on the match
    /// are subtracted, which is exact in any order. Records without stored
    /// deltas, or an engine configured with [`ReversalStrategy::Reconstruct`],
    /// recompute the deltas from the current ratings; that only restores the
    /// previous ratings when each player's matches are reversed newest first.
    pub fn reverse_match(
        &self,
        players: &[Player],
        record: &MatchRecord,
    ) -> Result<Vec<Player>, IntegrityError> {
        let result = &record.result;
        let changes = match self.reversal {
            ReversalStrategy::StoredDelta if !record.rating_changes.is_empty() => {
                record.rating_changes.clone()
            }
            _ => self.compute_deltas(players, result)?,
        };

        for player_id in result.participants() {
            if !players.iter().any(|p| p.id == player_id) {
                return Err(IntegrityError::UnknownPlayer { player_id });
            }
        }

        players
            .iter()
            .map(|player| match result.side_of(&player.id) {
                Some(side) => debit(player, result, side, delta_for(&changes, player)),
                None => Ok(player.clone()),
            })
            .collect()
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new(&RatingConfig::default())
    }
}

/// Add one result to a participant; fails rather than wrapping on overflow
fn credit(
    player: &Player,
    result: &MatchResult,
    side: Side,
    delta: i32,
) -> Result<Player, IntegrityError> {
    let overflow = || IntegrityError::StatsOverflow {
        player_id: player.id,
    };
    let mut updated = player.clone();
    let stats = &mut updated.stats;

    updated.rating = player.rating.checked_add(delta).ok_or_else(overflow)?;
    stats.matches_played = stats.matches_played.checked_add(1).ok_or_else(overflow)?;
    if side == result.winner {
        stats.wins = stats.wins.checked_add(1).ok_or_else(overflow)?;
    } else {
        stats.losses = stats.losses.checked_add(1).ok_or_else(overflow)?;
    }
    stats.games_won = stats
        .games_won
        .checked_add(result.score(side))
        .ok_or_else(overflow)?;
    stats.games_lost = stats
        .games_lost
        .checked_add(result.score(side.opponent()))
        .ok_or_else(overflow)?;
    Ok(updated)
}

/// Take one result back off a participant. Counters floor at zero.
fn debit(
    player: &Player,
    result: &MatchResult,
    side: Side,
    delta: i32,
) -> Result<Player, IntegrityError> {
    let mut restored = player.clone();
    restored.rating = player
        .rating
        .checked_sub(delta)
        .ok_or(IntegrityError::StatsOverflow {
            player_id: player.id,
        })?;

    let stats = &mut restored.stats;
    stats.matches_played = stats.matches_played.saturating_sub(1);
    if side == result.winner {
        stats.wins = stats.wins.saturating_sub(1);
    } else {
        stats.losses = stats.losses.saturating_sub(1);
    }
    stats.games_won = stats.games_won.saturating_sub(result.score(side));
    stats.games_lost = stats.games_lost.saturating_sub(result.score(side.opponent()));
    Ok(restored)
}

fn delta_for(changes: &[RatingDelta], player: &Player) -> i32 {
    changes
        .iter()
        .find(|change| change.player_id == player.id)
        .map(|change| change.delta)
        .unwrap_or_default()
}
