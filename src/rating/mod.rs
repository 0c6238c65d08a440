//! Elo-style rating system for doubles matches
//!
//! This module provides the margin-scaled Elo calculation and the engine that
//! applies or reverses one match's effect on its four participants.

pub mod calculator;
pub mod engine;

// Re-export commonly used types
pub use calculator::{EloCalculator, TeamAverages};
pub use engine::{AppliedMatch, RatingEngine};
