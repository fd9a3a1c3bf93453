//! Common type definitions and newtype wrappers for domain modeling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A chat group identifier.
///
/// Chat platforms hand out signed ids (Telegram groups are negative), so the
/// inner value is an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for GroupId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A user handle such as `@alice`.
///
/// A handle is `@` followed by one or more ASCII letters, digits or
/// underscores. The leading `@` is part of the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Prefix every handle starts with.
    pub const SIGIL: char = '@';

    /// Parses a handle, rejecting anything outside the handle grammar.
    pub fn parse(raw: &str) -> KarmaResult<Self> {
        if Self::is_valid(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(Self::invalid(raw))
        }
    }

    fn invalid(raw: &str) -> KarmaError {
        KarmaError::validation(format!("'{raw}' is not a valid handle"), Some("handle"))
    }

    /// Returns true when `raw` matches the handle grammar.
    pub fn is_valid(raw: &str) -> bool {
        raw.strip_prefix(Self::SIGIL).is_some_and(|name| {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
    }

    /// The handle including its leading `@`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Handle {
    type Err = KarmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Handle {
    type Error = KarmaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(Self::invalid(&value))
        }
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Handle {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Handle {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Result type for karma operations.
pub type KarmaResult<T> = std::result::Result<T, KarmaError>;

/// Boxed error source carried by [`KarmaError`] variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Application-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum KarmaError {
    /// Configuration error. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistent storage error.
    #[error("Database error: {message}")]
    Database {
        /// What failed.
        message: String,
        /// Underlying driver error.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Localization error.
    #[error("Localization error: {message}")]
    Localization {
        /// What failed.
        message: String,
        /// Locale being loaded, when known.
        locale: Option<String>,
    },

    /// Invalid user input or data.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong.
        message: String,
        /// Offending field, when known.
        field: Option<String>,
    },

    /// Chat platform delivery error.
    #[error("Transport error: {message}")]
    Transport {
        /// What failed.
        message: String,
        /// Underlying platform error.
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KarmaError {
    /// Creates a database error with an optional source.
    pub fn database(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Self::Database {
            message: message.into(),
            source,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::Validation {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    /// Creates a localization error.
    pub fn localization(message: impl Into<String>, locale: Option<&str>) -> Self {
        Self::Localization {
            message: message.into(),
            locale: locale.map(str::to_string),
        }
    }

    /// Creates a transport error wrapping the platform error.
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the error is fatal for the process rather than a single command.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Localization { .. })
    }

    /// Whether the error came from delivering a message to the chat platform.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
