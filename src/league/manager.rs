//! League service
//!
//! Coordinates validation, both ranking systems and storage. Every mutating
//! operation runs under a single writer lock, reads the full snapshot, builds
//! the next one and commits it in one call.

use crate::config::AppConfig;
use crate::error::{IntegrityError, LeagueError, Result, ValidationError};
use crate::league::store::{LeagueSnapshot, LeagueStore};
use crate::rating::RatingEngine;
use crate::standings::StandingsCalculator;
use crate::types::{
    Game, GameId, MatchId, MatchInput, MatchRecord, NamedStanding, Player, PlayerId, Tournament,
    TournamentId,
};
use crate::utils::{current_timestamp, generate_id};
use crate::validation::MatchValidator;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Players and rated matches, plus cumulative-points tournaments
pub struct League {
    store: Arc<dyn LeagueStore>,
    config: AppConfig,
    rating_engine: RatingEngine,
    standings: StandingsCalculator,
    match_validator: MatchValidator,
    game_validator: MatchValidator,
    writer: Mutex<()>,
}

impl League {
    pub fn new(store: Arc<dyn LeagueStore>, config: AppConfig) -> Self {
        Self {
            rating_engine: RatingEngine::new(&config.rating),
            standings: StandingsCalculator::new(config.points.clone()),
            match_validator: MatchValidator::for_ratings(&config.rating),
            game_validator: MatchValidator::for_tournaments(),
            store,
            config,
            writer: Mutex::new(()),
        }
    }

    /// Create a league and seed its roster with `names`
    pub fn with_roster<I, S>(
        store: Arc<dyn LeagueStore>,
        config: AppConfig,
        names: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let league = Self::new(store, config);
        for name in names {
            league.add_player(name.as_ref())?;
        }
        Ok(league)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run `operation` against the current snapshot and commit what it returns.
    ///
    /// The lock guards no data of its own and an interrupted write never
    /// reaches `commit`, so a poisoned lock is taken over as is.
    fn write<T>(
        &self,
        operation: impl FnOnce(&mut LeagueSnapshot) -> Result<T>,
    ) -> Result<T> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut snapshot = self.store.load()?;
        let output = operation(&mut snapshot)?;
        self.store.commit(snapshot)?;
        Ok(output)
    }

    // Roster

    pub fn add_player(&self, name: &str) -> Result<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::from(ValidationError::EmptyPlayerName).into());
        }

        let player = self.write(|snapshot| {
            ensure_unique_name(&snapshot.players, name, None)?;
            let player = Player::new(name, self.config.rating.initial_rating);
            snapshot.players.push(player.clone());
            Ok(player)
        })?;

        info!("Added player '{}' ({})", player.name, player.id);
        Ok(player)
    }

    pub fn rename_player(&self, player_id: PlayerId, name: &str) -> Result<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::from(ValidationError::EmptyPlayerName).into());
        }

        self.write(|snapshot| {
            ensure_unique_name(&snapshot.players, name, Some(player_id))?;
            let player = snapshot
                .players
                .iter_mut()
                .find(|p| p.id == player_id)
                .ok_or(LeagueError::from(IntegrityError::UnknownPlayer { player_id }))?;
            debug!("Renaming player {} from '{}' to '{}'", player_id, player.name, name);
            player.name = name.to_string();
            Ok(player.clone())
        })
    }

    /// Remove a player that has never played a rated match or tournament game
    pub fn remove_player(&self, player_id: PlayerId) -> Result<Player> {
        let removed = self.write(|snapshot| {
            let position = snapshot
                .players
                .iter()
                .position(|p| p.id == player_id)
                .ok_or(LeagueError::from(IntegrityError::UnknownPlayer { player_id }))?;

            let has_history = snapshot.players[position].stats.matches_played > 0
                || snapshot.matches.iter().any(|m| m.result.involves(&player_id))
                || snapshot.games.iter().any(|g| g.result.involves(&player_id));
            if has_history {
                return Err(integrity(IntegrityError::PlayerHasHistory { player_id }));
            }

            Ok(snapshot.players.remove(position))
        });

        match &removed {
            Ok(player) => info!("Removed player '{}' ({})", player.name, player.id),
            Err(e) => warn!("Refused to remove player {}: {}", player_id, e),
        }
        removed
    }

    pub fn players(&self) -> Result<Vec<Player>> {
        Ok(self.store.load()?.players)
    }

    pub fn player(&self, player_id: PlayerId) -> Result<Player> {
        self.store
            .load()?
            .players
            .into_iter()
            .find(|p| p.id == player_id)
            .ok_or_else(|| LeagueError::from(IntegrityError::UnknownPlayer { player_id }).into())
    }

    /// Look up a player by display name, ignoring case
    pub fn find_player(&self, name: &str) -> Result<Option<Player>> {
        let name = name.trim();
        Ok(self
            .store
            .load()?
            .players
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name)))
    }

    // Rated matches

    /// Validate and apply a rated match, storing it as the newest record
    pub fn record_match(&self, input: &MatchInput) -> Result<MatchRecord> {
        let result = self
            .match_validator
            .validate(input)
            .map_err(LeagueError::from)?;

        let record = self.write(|snapshot| {
            let applied = self
                .rating_engine
                .apply_match(&snapshot.players, &result)
                .map_err(LeagueError::from)?;

            let record = MatchRecord {
                id: generate_id(),
                result: result.clone(),
                rating_changes: applied.changes,
                date: input.date,
                created_at: current_timestamp(),
            };

            snapshot.players = applied.players;
            snapshot.matches.insert(0, record.clone());
            Ok(record)
        })?;

        info!(
            "Recorded match {} ({}-{}, {} won)",
            record.id, record.result.team1_score, record.result.team2_score, record.result.winner
        );
        Ok(record)
    }

    /// Reverse a match's rating effect and drop it from the history
    pub fn delete_match(&self, match_id: MatchId) -> Result<MatchRecord> {
        let record = self.write(|snapshot| {
            let position = snapshot
                .matches
                .iter()
                .position(|m| m.id == match_id)
                .ok_or(LeagueError::from(IntegrityError::MatchNotFound { match_id }))?;

            let record = snapshot.matches[position].clone();
            snapshot.players = self
                .rating_engine
                .reverse_match(&snapshot.players, &record)
                .map_err(LeagueError::from)?;
            snapshot.matches.remove(position);
            Ok(record)
        })?;

        info!("Deleted match {}", record.id);
        Ok(record)
    }

    /// Rated matches, newest first
    pub fn matches(&self) -> Result<Vec<MatchRecord>> {
        Ok(self.store.load()?.matches)
    }

    /// Players with at least one rated match, highest rating first
    pub fn ranking(&self) -> Result<Vec<Player>> {
        let mut ranked: Vec<Player> = self
            .store
            .load()?
            .players
            .into_iter()
            .filter(|p| p.stats.matches_played > 0)
            .collect();
        ranked.sort_by(|a, b| b.rating.cmp(&a.rating));
        Ok(ranked)
    }

    // Tournaments

    pub fn create_tournament(&self, name: &str) -> Result<Tournament> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::from(ValidationError::EmptyTournamentName).into());
        }

        let tournament = self.write(|snapshot| {
            let tournament = Tournament::new(name);
            snapshot.tournaments.push(tournament.clone());
            Ok(tournament)
        })?;

        info!("Created tournament '{}' ({})", tournament.name, tournament.id);
        Ok(tournament)
    }

    pub fn tournaments(&self) -> Result<Vec<Tournament>> {
        Ok(self.store.load()?.tournaments)
    }

    pub fn tournament(&self, tournament_id: TournamentId) -> Result<Tournament> {
        let snapshot = self.store.load()?;
        Ok(find_tournament(&snapshot, tournament_id)?.clone())
    }

    /// Record a game in an active tournament
    pub fn record_game(&self, tournament_id: TournamentId, input: &MatchInput) -> Result<Game> {
        let result = self
            .game_validator
            .validate(input)
            .map_err(LeagueError::from)?;

        let game = self.write(|snapshot| {
            let tournament = find_tournament(snapshot, tournament_id)?;
            if !tournament.is_active {
                return Err(integrity(IntegrityError::TournamentClosed { tournament_id }));
            }
            for player_id in result.participants() {
                if !snapshot.players.iter().any(|p| p.id == player_id) {
                    return Err(integrity(IntegrityError::UnknownPlayer { player_id }));
                }
            }

            let game = Game {
                id: generate_id(),
                tournament_id,
                result: result.clone(),
                date: input.date,
                created_at: current_timestamp(),
            };
            snapshot.games.insert(0, game.clone());
            Ok(game)
        })?;

        info!("Recorded game {} in tournament {}", game.id, tournament_id);
        Ok(game)
    }

    /// Drop a game; standings pick the change up on the next read
    pub fn delete_game(&self, game_id: GameId) -> Result<Game> {
        let game = self.write(|snapshot| {
            let position = snapshot
                .games
                .iter()
                .position(|g| g.id == game_id)
                .ok_or(LeagueError::from(IntegrityError::GameNotFound { game_id }))?;
            Ok(snapshot.games.remove(position))
        })?;

        info!("Deleted game {} from tournament {}", game.id, game.tournament_id);
        Ok(game)
    }

    /// Games of one tournament, newest first
    pub fn games(&self, tournament_id: TournamentId) -> Result<Vec<Game>> {
        Ok(self
            .store
            .load()?
            .games
            .into_iter()
            .filter(|g| g.tournament_id == tournament_id)
            .collect())
    }

    /// Close a tournament with its winner. There is no way back.
    pub fn mark_winner(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> Result<Tournament> {
        let tournament = self.write(|snapshot| {
            if !snapshot.players.iter().any(|p| p.id == player_id) {
                return Err(integrity(IntegrityError::UnknownPlayer { player_id }));
            }

            let tournament = snapshot
                .tournaments
                .iter_mut()
                .find(|t| t.id == tournament_id)
                .ok_or(LeagueError::from(IntegrityError::TournamentNotFound { tournament_id }))?;
            if !tournament.is_active {
                return Err(integrity(IntegrityError::TournamentClosed { tournament_id }));
            }

            tournament.is_active = false;
            tournament.winner = Some(player_id);
            tournament.completed_at = Some(current_timestamp());
            Ok(tournament.clone())
        })?;

        info!("Tournament '{}' won by {}", tournament.name, player_id);
        Ok(tournament)
    }

    /// Current table for one tournament, recomputed from its games
    pub fn standings(&self, tournament_id: TournamentId) -> Result<Vec<NamedStanding>> {
        let snapshot = self.store.load()?;
        let tournament = find_tournament(&snapshot, tournament_id)?;

        // Oldest first, so ties resolve in the order players entered the tournament
        let games: Vec<Game> = snapshot
            .games
            .iter()
            .rev()
            .filter(|g| g.tournament_id == tournament_id)
            .cloned()
            .collect();

        let standings = self
            .standings
            .compute_standings(&games, tournament.winner.as_ref());

        Ok(standings
            .into_iter()
            .map(|standing| NamedStanding {
                name: snapshot
                    .players
                    .iter()
                    .find(|p| p.id == standing.player_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| standing.player_id.to_string()),
                standing,
            })
            .collect())
    }
}

fn ensure_unique_name(players: &[Player], name: &str, except: Option<PlayerId>) -> Result<()> {
    let taken = players
        .iter()
        .any(|p| Some(p.id) != except && p.name.eq_ignore_ascii_case(name));
    if taken {
        return Err(LeagueError::from(ValidationError::DuplicatePlayerName {
            name: name.to_string(),
        })
        .into());
    }
    Ok(())
}

fn find_tournament(snapshot: &LeagueSnapshot, tournament_id: TournamentId) -> Result<&Tournament> {
    snapshot
        .tournaments
        .iter()
        .find(|t| t.id == tournament_id)
        .ok_or_else(|| integrity(IntegrityError::TournamentNotFound { tournament_id }))
}

fn integrity(error: IntegrityError) -> anyhow::Error {
    LeagueError::from(error).into()
}
