//! Cumulative tournament points
//!
//! Standings are never stored: they are folded from a tournament's game log
//! every time they are asked for, so deleting a game needs no reversal step.

pub mod calculator;

pub use calculator::StandingsCalculator;
