//! Test fixtures and store doubles for integration testing

use padel_ladder::config::AppConfig;
use padel_ladder::league::{InMemoryLeagueStore, LeagueSnapshot, LeagueStore};
use padel_ladder::{League, MatchInput, PlayerId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// The league's founding roster
pub const SAMPLE_ROSTER: [&str; 12] = [
    "Alex", "Maria", "Carlos", "Sofia", "Diego", "Ana", "Luis", "Carmen", "Pablo", "Elena",
    "Javier", "Isabel",
];

/// Store wrapper whose commits can be switched to fail, simulating a remote write error
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: InMemoryLeagueStore,
    fail_commits: AtomicBool,
    commits: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_commits.store(failing, Ordering::SeqCst);
    }

    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

impl LeagueStore for FlakyStore {
    fn load(&self) -> padel_ladder::Result<LeagueSnapshot> {
        self.inner.load()
    }

    fn commit(&self, snapshot: LeagueSnapshot) -> padel_ladder::Result<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("simulated storage outage"));
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.inner.commit(snapshot)
    }
}

/// League over an in-memory store, seeded with the sample roster
pub fn create_test_league() -> League {
    League::with_roster(
        Arc::new(InMemoryLeagueStore::default()),
        AppConfig::default(),
        SAMPLE_ROSTER,
    )
    .unwrap()
}

/// Look up a seeded player's id by name
pub fn id_of(league: &League, name: &str) -> PlayerId {
    league.find_player(name).unwrap().unwrap().id
}

/// Fully filled-in form using player names
pub fn input(
    league: &League,
    team1: [&str; 2],
    team2: [&str; 2],
    scores: (u32, u32),
) -> MatchInput {
    MatchInput::new(
        [id_of(league, team1[0]), id_of(league, team1[1])],
        [id_of(league, team2[0]), id_of(league, team2[1])],
        scores.0,
        scores.1,
    )
}
