//! Common types used throughout the league engine

use crate::utils::{current_timestamp, generate_id};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = Uuid;

/// Unique identifier for rated matches
pub type MatchId = Uuid;

/// Unique identifier for tournaments
pub type TournamentId = Uuid;

/// Unique identifier for tournament games
pub type GameId = Uuid;

/// One of the two pairs in a doubles match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Team1 => write!(f, "team1"),
            Side::Team2 => write!(f, "team2"),
        }
    }
}

/// Counters accumulated by the rating engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl PlayerStats {
    /// Percentage of matches won, rounded to the nearest integer
    pub fn win_rate(&self) -> u32 {
        percentage(self.wins, self.matches_played)
    }

    /// Percentage of individual games won across all matches
    pub fn game_win_rate(&self) -> u32 {
        percentage(self.games_won, self.games_won + self.games_lost)
    }
}

fn percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(total) * 100.0).round() as u32
}

/// A league member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub rating: i32,
    #[serde(default)]
    pub stats: PlayerStats,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: impl Into<String>, initial_rating: i32) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            rating: initial_rating,
            stats: PlayerStats::default(),
            created_at: current_timestamp(),
        }
    }
}

/// Raw match submission as entered by a user, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchInput {
    pub team1: [Option<PlayerId>; 2],
    pub team2: [Option<PlayerId>; 2],
    pub team1_score: Option<String>,
    pub team2_score: Option<String>,
    pub date: Option<NaiveDate>,
}

impl MatchInput {
    /// Convenience constructor for a fully filled-in form
    pub fn new(
        team1: [PlayerId; 2],
        team2: [PlayerId; 2],
        team1_score: u32,
        team2_score: u32,
    ) -> Self {
        Self {
            team1: [Some(team1[0]), Some(team1[1])],
            team2: [Some(team2[0]), Some(team2[1])],
            team1_score: Some(team1_score.to_string()),
            team2_score: Some(team2_score.to_string()),
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Validated outcome of a doubles match; immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub team1: [PlayerId; 2],
    pub team2: [PlayerId; 2],
    pub team1_score: u32,
    pub team2_score: u32,
    pub winner: Side,
}

impl MatchResult {
    pub fn team(&self, side: Side) -> &[PlayerId; 2] {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Team1 => self.team1_score,
            Side::Team2 => self.team2_score,
        }
    }

    /// Which side a player was on, if they took part
    pub fn side_of(&self, player_id: &PlayerId) -> Option<Side> {
        if self.team1.contains(player_id) {
            Some(Side::Team1)
        } else if self.team2.contains(player_id) {
            Some(Side::Team2)
        } else {
            None
        }
    }

    pub fn participants(&self) -> [PlayerId; 4] {
        [self.team1[0], self.team1[1], self.team2[0], self.team2[1]]
    }

    pub fn involves(&self, player_id: &PlayerId) -> bool {
        self.side_of(player_id).is_some()
    }

    pub fn score_difference(&self) -> u32 {
        self.team1_score.abs_diff(self.team2_score)
    }
}

/// Signed rating change applied to one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDelta {
    pub player_id: PlayerId,
    pub delta: i32,
}

/// A rated match as stored in the league history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub result: MatchResult,
    /// Empty for records written before deltas were stored
    #[serde(default)]
    pub rating_changes: Vec<RatingDelta>,
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A cumulative-points tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub is_active: bool,
    pub winner: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Tournament {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            is_active: true,
            winner: None,
            created_at: current_timestamp(),
            completed_at: None,
        }
    }
}

/// A game played inside a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub tournament_id: TournamentId,
    pub result: MatchResult,
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// One participant's row in a tournament table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub total_points: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub total_scored: u32,
}

impl Standing {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            total_points: 0,
            games_played: 0,
            games_won: 0,
            total_scored: 0,
        }
    }
}

/// A standing paired with the player's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedStanding {
    pub name: String,
    #[serde(flatten)]
    pub standing: Standing,
}
