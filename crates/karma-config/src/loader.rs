//! Configuration loading from file and environment.

use crate::schema::Config;
use karma_common::{KarmaError, KarmaResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Names the optional configuration file.
pub const CONFIG_PATH_VAR: &str = "KARMABOT_CONFIG";
/// Bot token. Required.
pub const TOKEN_VAR: &str = "KARMABOT_TOKEN";
/// Overrides `database.path`.
pub const DATABASE_VAR: &str = "KARMABOT_DATABASE";
/// Overrides `replies.language`.
pub const LANGUAGE_VAR: &str = "KARMABOT_LANGUAGE";
/// Overrides `replies.confirm_votes`.
pub const CONFIRM_VOTES_VAR: &str = "KARMABOT_CONFIRM_VOTES";
/// Overrides `logging.level`.
pub const LOG_VAR: &str = "KARMABOT_LOG";

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> KarmaResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(KarmaError::Config(format!(
                "unsupported config file '{}', expected .toml, .yaml or .yml",
                path.display()
            ))),
        }
    }
}

/// Loads configuration from an optional file plus the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Creates a loader reading the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Creates a loader for the file named by `KARMABOT_CONFIG`, if set.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from),
        }
    }

    /// Loads file, applies process environment overrides, validates.
    pub async fn load(&self) -> KarmaResult<Config> {
        self.load_with(|key| std::env::var(key).ok()).await
    }

    /// Like [`ConfigLoader::load`] but reads variables through `lookup`.
    pub async fn load_with<F>(&self, lookup: F) -> KarmaResult<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.load_file().await?;
        apply_env_overrides(&mut config, lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration file, or returns defaults when there is none.
    pub async fn load_file(&self) -> KarmaResult<Config> {
        let Some(path) = &self.path else {
            debug!("No configuration file given, using defaults");
            return Ok(Config::default());
        };

        let format = ConfigFormat::from_path(path)?;
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            KarmaError::Config(format!("failed to read '{}': {e}", path.display()))
        })?;
        info!(path = %path.display(), "Loaded configuration file");
        Self::parse(&content, format)
    }

    /// Parses configuration text.
    pub fn parse(content: &str, format: ConfigFormat) -> KarmaResult<Config> {
        match format {
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| KarmaError::Config(format!("invalid TOML configuration: {e}"))),
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| KarmaError::Config(format!("invalid YAML configuration: {e}"))),
        }
    }
}

/// Overlays `KARMABOT_*` variables onto `config`. Empty values count as unset.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> KarmaResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(token) = var(TOKEN_VAR) {
        config.bot.token = token.trim().to_string();
    }
    if let Some(path) = var(DATABASE_VAR) {
        config.database.path = PathBuf::from(path);
    }
    if let Some(language) = var(LANGUAGE_VAR) {
        config.replies.language = language;
    }
    if let Some(flag) = var(CONFIRM_VOTES_VAR) {
        config.replies.confirm_votes = parse_flag(CONFIRM_VOTES_VAR, &flag)?;
    }
    if let Some(level) = var(LOG_VAR) {
        config.logging.level = level;
    }
    Ok(())
}

fn parse_flag(key: &str, value: &str) -> KarmaResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(KarmaError::Config(format!(
            "{key} must be true or false, got '{other}'"
        ))),
    }
}
