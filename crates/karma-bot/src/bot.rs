//! Core bot logic using the Poise framework.

use crate::error::BotResult;
use karma_commands::{create_framework, Data, KarmaService, ServiceOptions};
use karma_config::Config;
use karma_i18n::Messages;
use karma_store::KarmaStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{info, warn};

/// Main bot structure.
#[derive(Debug)]
pub struct KarmaBot {
    config: Arc<Config>,
    service: Arc<KarmaService>,
}

impl KarmaBot {
    /// Opens the store and loads replies. Does not connect yet.
    pub fn new(config: Config) -> BotResult<Self> {
        let store = KarmaStore::open(&config.database.path)?;
        let stats = store.stats()?;
        info!(
            users = stats.users,
            groups = stats.groups,
            karma_records = stats.karma_records,
            schema_version = store.schema_version()?,
            "Karma database ready"
        );

        let messages = Messages::load(&config.replies.language, config.bot.command_prefix.clone())?;
        let service = KarmaService::new(Arc::new(store), messages, ServiceOptions::from(&config));

        Ok(Self {
            config: Arc::new(config),
            service: Arc::new(service),
        })
    }

    /// The karma service shared with command handlers.
    pub fn service(&self) -> &KarmaService {
        &self.service
    }

    /// Connects to Discord and handles commands until the gateway closes or
    /// Ctrl-C is pressed.
    pub async fn start(&self) -> BotResult<()> {
        let config = Arc::clone(&self.config);
        let service = Arc::clone(&self.service);

        let framework = create_framework(&self.config.bot.command_prefix)
            .setup(move |_ctx, ready, _framework| {
                Box::pin(async move {
                    info!(user = %ready.user.name, "Connected to Discord");
                    Ok(Data { config, service })
                })
            })
            .build();

        let intents = serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;
        let mut client = serenity::ClientBuilder::new(&self.config.bot.token, intents)
            .framework(framework)
            .await?;

        let shard_manager = Arc::clone(&client.shard_manager);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown requested");
                    shard_manager.shutdown_all().await;
                }
                Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
            }
        });

        client.start().await?;
        info!("Bot stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karma_common::test_utils::{chat_fixtures, db_fixtures::temp_db_path, init_test_logging};

    fn config_at(path: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.bot.token = "test-token".to_string();
        config.database.path = path.to_path_buf();
        config
    }

    #[test]
    fn test_new_creates_database() {
        init_test_logging();
        let (_dir, path) = temp_db_path();
        let bot = KarmaBot::new(config_at(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(bot.service().store().stats().unwrap().users, 0);
    }

    #[test]
    fn test_service_uses_configured_prefix() {
        init_test_logging();
        let (_dir, path) = temp_db_path();
        let mut config = config_at(&path);
        config.bot.command_prefix = "!".to_string();
        let bot = KarmaBot::new(config).unwrap();

        let group = chat_fixtures::test_group();
        assert_eq!(bot.service().handle_message("@alice", "/start", group).unwrap(), None);
        assert_eq!(
            bot.service().handle_message("@alice", "!start", group).unwrap().as_deref(),
            Some("Hi!")
        );
    }
}
