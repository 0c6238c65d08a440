//! Configuration management for the padel-ladder engine
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values for both ranking systems.

pub mod app;
pub mod points;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use points::PointsConfig;
pub use rating::{RatingConfig, ReversalStrategy};
