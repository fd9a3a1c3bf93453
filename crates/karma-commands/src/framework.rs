//! Poise framework setup and the glue between Discord and the karma service.

use crate::service::KarmaService;
use karma_common::{mention, GroupId, KarmaError, KarmaResult};
use karma_config::Config;
use std::sync::Arc;
use tracing::warn;

/// Application data accessible in all commands.
pub struct Data {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Karma rules and storage.
    pub service: Arc<KarmaService>,
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Creates a new Poise framework recognizing commands that start with `prefix`.
pub fn create_framework(prefix: &str) -> poise::FrameworkBuilder<Data, Error> {
    poise::Framework::builder().options(poise::FrameworkOptions {
        commands: vec![
            crate::greeting::start(),
            crate::greeting::help(),
            crate::vote::upvote(),
            crate::vote::downvote(),
            crate::rating::rating(),
            crate::top::top5(),
        ],
        prefix_options: prefix_options(prefix),
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    })
}

/// Prefix options: only `prefix` starts a command.
///
/// Mentioning the bot is not a prefix: handlers parse the whole message text,
/// which must start with `prefix`.
pub fn prefix_options(prefix: &str) -> poise::PrefixFrameworkOptions<Data, Error> {
    poise::PrefixFrameworkOptions {
        prefix: Some(prefix.into()),
        mention_as_prefix: false,
        ..Default::default()
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let service = &ctx.data().service;
            if reports_failure(&error) {
                let reply = service.failure_reply(&actor_of(ctx));
                if let Err(e) = ctx.say(reply).await {
                    warn!(channel = %ctx.channel_id(), error = %e, "Failed to report command failure");
                }
            }

            let context = format!(
                "command '{}' in channel {}",
                ctx.command().qualified_name,
                ctx.channel_id()
            );
            service.handle_unrecognized_error(&context, &error);
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                warn!("Error while handling framework error: {}", e);
            }
        }
    }
}

/// Whether the user should be told their command failed. Delivery failures
/// are only logged.
pub fn reports_failure(error: &Error) -> bool {
    !error
        .downcast_ref::<KarmaError>()
        .is_some_and(KarmaError::is_transport)
}

/// Handle of a Discord user.
///
/// Discord usernames may contain `.`, which handles cannot, so dots become
/// underscores: `john.doe` is `@john_doe`.
pub fn handle_for_username(username: &str) -> String {
    mention(&username.replace('.', "_"))
}

/// Replaces Discord user mentions (`<@id>` and `<@!id>`) with the mentioned
/// user's handle.
pub fn rewrite_mentions<'a>(content: &str, users: impl IntoIterator<Item = (u64, &'a str)>) -> String {
    users.into_iter().fold(content.to_string(), |text, (id, username)| {
        let handle = handle_for_username(username);
        text.replace(&format!("<@{id}>"), &handle)
            .replace(&format!("<@!{id}>"), &handle)
    })
}

/// Handle of the invoking user, e.g. `@alice`.
pub fn actor_of(ctx: Context<'_>) -> String {
    handle_for_username(&ctx.author().name)
}

/// Group id of the channel the command was sent in.
pub fn group_of(ctx: Context<'_>) -> Result<GroupId, Error> {
    Ok(GroupId(i64::try_from(ctx.channel_id().get())?))
}

/// Full text of the invoking message, with user mentions turned into handles.
pub fn message_text(ctx: Context<'_>) -> String {
    match ctx {
        poise::Context::Prefix(prefix) => rewrite_mentions(
            &prefix.msg.content,
            prefix.msg.mentions.iter().map(|user| (user.id.get(), user.name.as_str())),
        ),
        _ => String::new(),
    }
}

/// Runs `f` against the service on the blocking thread pool.
pub async fn run_blocking<T, F>(ctx: Context<'_>, f: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&KarmaService) -> KarmaResult<T> + Send + 'static,
{
    let service = Arc::clone(&ctx.data().service);
    let value = tokio::task::spawn_blocking(move || f(&service)).await??;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceOptions;
    use karma_common::test_utils::{chat_fixtures, handle, init_test_logging};
    use karma_i18n::Messages;
    use karma_store::KarmaStore;

    #[test]
    fn test_mentions_become_handles() {
        assert_eq!(
            rewrite_mentions("/upvote <@123456789012345678>", [(123_456_789_012_345_678, "bob")]),
            "/upvote @bob"
        );
        assert_eq!(
            rewrite_mentions("/rating <@!42>", [(42, "carol"), (7, "dave")]),
            "/rating @carol"
        );
        assert_eq!(rewrite_mentions("/upvote <@99>", std::iter::empty()), "/upvote <@99>");
    }

    #[test]
    fn test_dotted_usernames_map_to_valid_handles() {
        assert_eq!(handle_for_username("john.doe"), "@john_doe");
        assert_eq!(handle_for_username("alice"), "@alice");
        assert_eq!(
            rewrite_mentions("/upvote <@5>", [(5, "john.doe")]),
            "/upvote @john_doe"
        );
    }

    #[test]
    fn test_rewritten_mention_is_a_valid_vote() {
        init_test_logging();
        let store = Arc::new(KarmaStore::open_in_memory().unwrap());
        let messages = Messages::load("en-US", "/").unwrap();
        let service = KarmaService::new(store, messages, ServiceOptions::default());
        let group = chat_fixtures::test_group();

        let actor = handle_for_username("alice");
        let text = rewrite_mentions("/upvote <@123456789012345678>", [(123_456_789_012_345_678, "john.doe")]);
        assert_eq!(service.handle_upvote(&actor, &text, group).unwrap(), None);
        assert_eq!(
            service.store().get_karma(&handle("@john_doe"), group).unwrap(),
            Some(1)
        );
    }

    #[test]
    fn test_only_non_delivery_failures_are_reported() {
        let delivery: Error = KarmaError::transport("send failed", std::io::Error::other("reset")).into();
        let database: Error = KarmaError::database("locked", None).into();
        let other: Error = std::io::Error::other("join failed").into();

        assert!(!reports_failure(&delivery));
        assert!(reports_failure(&database));
        assert!(reports_failure(&other));
    }

    #[test]
    fn test_bot_mention_is_not_a_prefix() {
        let options = prefix_options("/");
        assert_eq!(options.prefix.as_deref(), Some("/"));
        assert!(!options.mention_as_prefix);
    }
}
