//! Main application configuration
//!
//! This module defines the top-level configuration for the padel-ladder
//! binary, including environment variable loading, TOML files and validation.

use crate::config::points::PointsConfig;
use crate::config::rating::RatingConfig;
use crate::error::LeagueError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub points: PointsConfig,
}

/// Process-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// JSON file holding the league snapshot
    pub data_file: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_file: PathBuf::from("league.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(data_file) = env::var("DATA_FILE") {
            self.service.data_file = PathBuf::from(data_file);
        }

        // Rating settings
        if let Ok(k) = env::var("RATING_K_FACTOR") {
            self.rating.k_factor = k
                .parse()
                .map_err(|_| config_error(format!("Invalid RATING_K_FACTOR value: {}", k)))?;
        }
        if let Ok(initial) = env::var("RATING_INITIAL") {
            self.rating.initial_rating = initial
                .parse()
                .map_err(|_| config_error(format!("Invalid RATING_INITIAL value: {}", initial)))?;
        }
        if let Ok(step) = env::var("RATING_MARGIN_STEP") {
            self.rating.margin_step = step
                .parse()
                .map_err(|_| config_error(format!("Invalid RATING_MARGIN_STEP value: {}", step)))?;
        }
        if let Ok(min_score) = env::var("RATING_MIN_WINNING_SCORE") {
            self.rating.min_winning_score = min_score
                .parse()
                .map_err(|_| {
                    config_error(format!("Invalid RATING_MIN_WINNING_SCORE value: {}", min_score))
                })?;
        }
        if let Ok(reversal) = env::var("RATING_REVERSAL") {
            self.rating.reversal = reversal
                .parse()
                .map_err(|e| config_error(format!("RATING_REVERSAL: {}", e)))?;
        }

        // Points settings
        if let Ok(bonus) = env::var("POINTS_WIN_BONUS") {
            self.points.win_bonus = bonus
                .parse()
                .map_err(|_| config_error(format!("Invalid POINTS_WIN_BONUS value: {}", bonus)))?;
        }
        if let Ok(bonus) = env::var("POINTS_TOURNAMENT_BONUS") {
            self.points.tournament_bonus = bonus
                .parse()
                .map_err(|_| {
                    config_error(format!("Invalid POINTS_TOURNAMENT_BONUS value: {}", bonus))
                })?;
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> anyhow::Error {
    LeagueError::configuration(message).into()
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(config_error(format!("Invalid log level: {}", config.service.log_level))),
    }

    if config.service.data_file.as_os_str().is_empty() {
        return Err(config_error("Data file path cannot be empty"));
    }

    // Validate rating settings
    if !config.rating.k_factor.is_finite() || config.rating.k_factor <= 0.0 {
        return Err(config_error("K-factor must be positive"));
    }
    if !config.rating.margin_step.is_finite() || config.rating.margin_step < 0.0 {
        return Err(config_error("Margin step must be non-negative"));
    }

    Ok(())
}
