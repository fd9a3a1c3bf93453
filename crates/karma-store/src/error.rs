//! Store error types.

use karma_common::{GroupId, Handle, KarmaError};

/// Errors raised by [`crate::KarmaStore`].
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// SQLite driver error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `adjust_karma` was called before `ensure_karma`.
    #[error("no karma record for {handle} in group {group}")]
    MissingRecord {
        /// Handle that was adjusted.
        handle: Handle,
        /// Group that was adjusted.
        group: GroupId,
    },

    /// The database was written by a newer version of the bot.
    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema {
        /// Version recorded in the database.
        found: i64,
        /// Newest version this build understands.
        supported: i64,
    },

    /// The adjustment does not fit in a 64-bit score.
    #[error("karma of {handle} in group {group} would overflow")]
    Overflow {
        /// Handle that was adjusted.
        handle: Handle,
        /// Group that was adjusted.
        group: GroupId,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for KarmaError {
    fn from(error: StoreError) -> Self {
        Self::database(error.to_string(), Some(Box::new(error)))
    }
}
