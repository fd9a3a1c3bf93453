//! Main entry point for Karma Bot.

use karma_bot::{BotResult, KarmaBot};
use karma_common::{init_logging, LogSettings};
use karma_config::{Config, ConfigLoader};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ConfigLoader::from_env().load().await {
        Ok(config) => config,
        Err(e) => {
            // Logging settings live in the config; fall back to defaults to report this.
            let _guard = init_logging(&LogSettings::default()).ok();
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Bot failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> BotResult<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "Starting Karma Bot");
    let bot = KarmaBot::new(config)?;
    bot.start().await
}
