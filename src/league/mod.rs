//! League service and its storage boundary
//!
//! [`League`] is the single writer over players, rated matches and
//! tournaments; [`LeagueStore`] is where its snapshots are kept.

pub mod manager;
pub mod store;

pub use manager::League;
pub use store::{InMemoryLeagueStore, JsonFileLeagueStore, LeagueSnapshot, LeagueStore};
