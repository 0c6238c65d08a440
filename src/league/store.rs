//! League storage interface and implementations
//!
//! A store only ever sees whole snapshots: the league service computes the
//! next state in memory and hands it over in a single `commit`. A failed
//! commit leaves the previously stored snapshot in place.

use crate::error::LeagueError;
use crate::types::{Game, MatchRecord, Player, Tournament};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Everything the league persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueSnapshot {
    pub players: Vec<Player>,
    /// Newest first
    pub matches: Vec<MatchRecord>,
    pub tournaments: Vec<Tournament>,
    /// Newest first
    pub games: Vec<Game>,
}

/// Trait for league storage operations
#[cfg_attr(test, mockall::automock)]
pub trait LeagueStore: Send + Sync {
    /// Read the current snapshot
    fn load(&self) -> crate::error::Result<LeagueSnapshot>;

    /// Replace the stored snapshot; either all of it is written or none of it
    fn commit(&self, snapshot: LeagueSnapshot) -> crate::error::Result<()>;
}

/// In-memory league storage implementation
#[derive(Debug, Default)]
pub struct InMemoryLeagueStore {
    snapshot: RwLock<LeagueSnapshot>,
}

impl InMemoryLeagueStore {
    pub fn new(snapshot: LeagueSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }
}

impl LeagueStore for InMemoryLeagueStore {
    fn load(&self) -> crate::error::Result<LeagueSnapshot> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| LeagueError::StorageError {
                message: "Failed to acquire snapshot read lock".to_string(),
            })?;

        Ok(snapshot.clone())
    }

    fn commit(&self, snapshot: LeagueSnapshot) -> crate::error::Result<()> {
        let mut current = self
            .snapshot
            .write()
            .map_err(|_| LeagueError::StorageError {
                message: "Failed to acquire snapshot write lock".to_string(),
            })?;

        *current = snapshot;
        Ok(())
    }
}

/// Snapshot stored as a JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileLeagueStore {
    path: PathBuf,
}

impl JsonFileLeagueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LeagueStore for JsonFileLeagueStore {
    fn load(&self) -> crate::error::Result<LeagueSnapshot> {
        if !self.path.exists() {
            return Ok(LeagueSnapshot::default());
        }

        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read league file {}", self.path.display()))?;
        let snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse league file {}", self.path.display()))?;
        Ok(snapshot)
    }

    fn commit(&self, snapshot: LeagueSnapshot) -> crate::error::Result<()> {
        let json = serde_json::to_string_pretty(&snapshot)?;
        let temp = self.temp_path();

        // Rename is atomic, so readers see either the old or the new document
        std::fs::write(&temp, json)
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        std::fs::rename(&temp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
