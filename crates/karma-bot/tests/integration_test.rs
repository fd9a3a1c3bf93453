//! Integration tests for the karma-bot crate.
//!
//! These cover startup wiring; nothing here connects to Discord.

use karma_bot::{BotError, KarmaBot};
use karma_common::test_utils::{chat_fixtures, db_fixtures::temp_db_path, init_test_logging};
use karma_config::Config;

fn config_at(path: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.bot.token = "test-token".to_string();
    config.database.path = path.to_path_buf();
    config
}

#[test]
fn test_restart_keeps_scores() {
    init_test_logging();
    let (_dir, path) = temp_db_path();
    let group = chat_fixtures::test_group();

    {
        let bot = KarmaBot::new(config_at(&path)).unwrap();
        for _ in 0..3 {
            bot.service().handle_message("@alice", "/upvote @bob", group).unwrap();
        }
        bot.service().handle_message("@alice", "/downvote @bob", group).unwrap();
    }

    let bot = KarmaBot::new(config_at(&path)).unwrap();
    assert_eq!(
        bot.service().handle_message("@carol", "/rating @bob", group).unwrap().as_deref(),
        Some("@bob's karma is 2.")
    );
}

#[test]
fn test_confirm_votes_option_is_applied() {
    init_test_logging();
    let (_dir, path) = temp_db_path();
    let mut config = config_at(&path);
    config.replies.confirm_votes = true;

    let bot = KarmaBot::new(config).unwrap();
    assert_eq!(
        bot.service()
            .handle_message("@alice", "/upvote @bob", chat_fixtures::test_group())
            .unwrap()
            .as_deref(),
        Some("@bob's karma is now 1.")
    );
}

#[test]
fn test_unusable_database_path_fails_startup() {
    init_test_logging();
    let (dir, _) = temp_db_path();
    // A directory cannot be opened as a database file.
    let err = KarmaBot::new(config_at(dir.path())).unwrap_err();
    assert!(matches!(err, BotError::Karma(_)));
}

#[tokio::test]
async fn test_bot_builds_inside_runtime() {
    init_test_logging();
    let (_dir, path) = temp_db_path();
    let bot = tokio::task::spawn_blocking(move || KarmaBot::new(config_at(&path)).map(|_| ()))
        .await
        .unwrap();
    assert!(bot.is_ok());
}
