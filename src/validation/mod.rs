//! Pre-condition checks shared by both ranking systems
//!
//! Every match or game submission goes through [`MatchValidator`] before an
//! engine is allowed to touch player state.

pub mod validator;

pub use validator::{MatchValidator, MAX_SCORE};
