//! Application-wide error types using thiserror.

use karma_common::KarmaError;
use poise::serenity_prelude as serenity;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Configuration, storage or localization failure during startup.
    #[error("{0}")]
    Karma(#[from] KarmaError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<karma_store::StoreError> for BotError {
    fn from(error: karma_store::StoreError) -> Self {
        Self::Karma(error.into())
    }
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
