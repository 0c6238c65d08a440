//! Standings calculator

use crate::config::PointsConfig;
use crate::types::{Game, PlayerId, Side, Standing};
use std::collections::HashMap;

/// Folds a game log into ranked standings
#[derive(Debug, Clone, Default)]
pub struct StandingsCalculator {
    config: PointsConfig,
}

impl StandingsCalculator {
    pub fn new(config: PointsConfig) -> Self {
        Self { config }
    }

    /// Rank every participant of `games`.
    ///
    /// Players appear in the order they are first met (game order, team1 before
    /// team2). The sort is stable, so players level on points keep that order.
    pub fn compute_standings(&self, games: &[Game], winner: Option<&PlayerId>) -> Vec<Standing> {
        let mut standings: Vec<Standing> = Vec::new();
        let mut index: HashMap<PlayerId, usize> = HashMap::new();

        for game in games {
            let result = &game.result;
            for side in [Side::Team1, Side::Team2] {
                let score = result.score(side);
                let won = side == result.winner;

                for player_id in result.team(side) {
                    let slot = *index.entry(*player_id).or_insert_with(|| {
                        standings.push(Standing::new(*player_id));
                        standings.len() - 1
                    });

                    let standing = &mut standings[slot];
                    standing.games_played = standing.games_played.saturating_add(1);
                    standing.total_scored = standing.total_scored.saturating_add(score);
                    standing.total_points = standing.total_points.saturating_add(score);
                    if won {
                        standing.games_won = standing.games_won.saturating_add(1);
                        standing.total_points =
                            standing.total_points.saturating_add(self.config.win_bonus);
                    }
                }
            }
        }

        if let Some(slot) = winner.and_then(|id| index.get(id)) {
            let standing = &mut standings[*slot];
            standing.total_points = standing
                .total_points
                .saturating_add(self.config.tournament_bonus);
        }

        standings.retain(|standing| standing.games_played > 0);
        standings.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        standings
    }
}
