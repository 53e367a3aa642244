use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::utils;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub action: String,
    pub details: String,
    pub timestamp: String,
}

impl LogEntry {
    /// Stamps a new entry with the local time, formatted like the seeded log.
    pub fn record(user_id: &str, user_name: &str, action: &str, details: String) -> Self {
        Self {
            id: utils::new_id("l"),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            action: action.to_string(),
            details,
            timestamp: Local::now().format("%Y-%m-%d %I:%M %p").to_string(),
        }
    }
}
