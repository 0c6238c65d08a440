//! Utility functions for the league engine

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique record ID
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}
