//! Runtime validation.

use crate::schema::Config;
use karma_common::{KarmaError, KarmaResult};

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> KarmaResult<()> {
        if self.bot.token.trim().is_empty() {
            return Err(KarmaError::Config(format!(
                "bot token is not set, export {}",
                crate::loader::TOKEN_VAR
            )));
        }

        if self.bot.command_prefix.is_empty() || self.bot.command_prefix.contains(char::is_whitespace) {
            return Err(KarmaError::Config(
                "command prefix must be non-empty and contain no whitespace".to_string(),
            ));
        }

        if self.leaderboard.size == 0 {
            return Err(KarmaError::Config(
                "leaderboard size must be at least 1".to_string(),
            ));
        }

        if self.replies.language.trim().is_empty() {
            return Err(KarmaError::Config("reply language cannot be empty".to_string()));
        }

        Ok(())
    }
}
