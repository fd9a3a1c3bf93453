//! Configuration schema definitions.

use karma_common::LogSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for Karma Bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat platform connection.
    pub bot: BotConfig,
    /// Database location.
    pub database: DatabaseConfig,
    /// Reply behaviour.
    pub replies: RepliesConfig,
    /// Leaderboard settings.
    pub leaderboard: LeaderboardConfig,
    /// Logging settings.
    pub logging: LogSettings,
}

/// Chat platform connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Bot token. Required.
    pub token: String,
    /// Prefix that starts a command, `/` by default.
    pub command_prefix: String,
    /// How many times a failed reply is retried.
    pub delivery_retries: usize,
    /// First retry delay in milliseconds; later retries back off exponentially.
    pub retry_base_ms: u64,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("command_prefix", &self.command_prefix)
            .field("delivery_retries", &self.delivery_retries)
            .field("retry_base_ms", &self.retry_base_ms)
            .finish()
    }
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path.
    pub path: PathBuf,
}

/// Reply settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepliesConfig {
    /// Language of reply texts, e.g. `en-US`.
    pub language: String,
    /// Confirm successful votes with the new score instead of staying silent.
    pub confirm_votes: bool,
}

/// Leaderboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Number of entries shown by `/top5`.
    pub size: usize,
}
