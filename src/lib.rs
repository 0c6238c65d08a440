//! Padel Ladder - rankings for a recreational padel league
//!
//! This crate provides two ranking systems over the same players and doubles
//! results: a margin-scaled, team-average Elo rating that is applied and
//! reversed per match, and cumulative tournament points recomputed from the
//! game log on every read.

pub mod config;
pub mod error;
pub mod league;
pub mod rating;
pub mod standings;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used types and traits
pub use error::{IntegrityError, LeagueError, Result, ValidationError};
pub use types::*;

// Re-export key components
pub use league::{InMemoryLeagueStore, JsonFileLeagueStore, League, LeagueStore};
pub use rating::RatingEngine;
pub use standings::StandingsCalculator;
pub use validation::MatchValidator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
