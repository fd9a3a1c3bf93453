//! Default values.

use crate::schema::{BotConfig, DatabaseConfig, LeaderboardConfig, RepliesConfig};
use std::path::PathBuf;

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "karma.db";

/// Default reply language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default leaderboard length.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            command_prefix: "/".to_string(),
            delivery_retries: 2,
            retry_base_ms: 250,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            confirm_votes: false,
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}
