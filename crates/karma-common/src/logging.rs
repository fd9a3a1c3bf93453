//! Structured logging setup for the bot binary.

use crate::types::{KarmaError, KarmaResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging settings, usually read from the `[logging]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive, e.g. `info` or `karma_store=debug,info`.
    pub level: String,
    /// Emit JSON lines instead of human readable output.
    pub json: bool,
    /// Write to this file instead of stdout.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `settings.level` when set. The returned guard flushes
/// the non-blocking writer on drop and must live as long as the process logs.
pub fn init_logging(settings: &LogSettings) -> KarmaResult<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| KarmaError::Config(format!("invalid log level '{}': {e}", settings.level)))?;

    let (writer, guard) = match &settings.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                KarmaError::Config(format!("log file '{}' has no file name", path.display()))
            })?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name))
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if settings.json {
        registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(settings.file.is_none())
                    .with_target(true)
                    .with_writer(writer),
            )
            .try_init()
    };
    installed.map_err(|e| KarmaError::Config(format!("failed to install log subscriber: {e}")))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LogSettings::default();
        assert_eq!(settings.level, "info");
        assert!(!settings.json);
        assert!(settings.file.is_none());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: LogSettings = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert!(settings.json);
        assert_eq!(settings.level, "info");
    }
}
