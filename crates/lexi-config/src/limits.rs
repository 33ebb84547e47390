use std::env;

use serde::{Deserialize, Serialize};

pub const HISTORY_MAX_ITEMS: usize = 50;
pub const MAX_REQUESTED_LENGTH: i64 = 500;

fn default_history_max_items() -> usize {
    HISTORY_MAX_ITEMS
}

fn default_max_requested_length() -> i64 {
    MAX_REQUESTED_LENGTH
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    #[serde(default = "default_history_max_items")]
    pub history_max_items: usize,
    /// Upper bound accepted for the requested definition length
    #[serde(default = "default_max_requested_length")]
    pub max_requested_length: i64,
}

impl LimitsConfig {
    pub fn new() -> Self {
        let history_max_items = env::var("HISTORY_MAX_ITEMS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(HISTORY_MAX_ITEMS);

        let max_requested_length = env::var("MAX_REQUESTED_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(MAX_REQUESTED_LENGTH);

        Self {
            history_max_items,
            max_requested_length,
        }
    }
}

impl LimitsConfig {
    /// Replace non-positive limits, e.g. from a hand-edited profile, with
    /// the defaults
    pub fn sanitized(self) -> Self {
        Self {
            history_max_items: if self.history_max_items > 0 {
                self.history_max_items
            } else {
                HISTORY_MAX_ITEMS
            },
            max_requested_length: if self.max_requested_length > 0 {
                self.max_requested_length
            } else {
                MAX_REQUESTED_LENGTH
            },
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            history_max_items: HISTORY_MAX_ITEMS,
            max_requested_length: MAX_REQUESTED_LENGTH,
        }
    }
}
