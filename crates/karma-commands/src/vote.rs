//! `/upvote` and `/downvote`.

use crate::delivery::send_reply;
use crate::framework::{actor_of, group_of, message_text, run_blocking, Context, Error};
use crate::service::Vote;

/// Gives a user one karma point in this chat.
#[poise::command(prefix_command)]
pub async fn upvote(ctx: Context<'_>, #[rest] _target: Option<String>) -> Result<(), Error> {
    cast(ctx, Vote::Up).await
}

/// Takes one karma point from a user in this chat.
#[poise::command(prefix_command)]
pub async fn downvote(ctx: Context<'_>, #[rest] _target: Option<String>) -> Result<(), Error> {
    cast(ctx, Vote::Down).await
}

async fn cast(ctx: Context<'_>, vote: Vote) -> Result<(), Error> {
    let actor = actor_of(ctx);
    let text = message_text(ctx);
    let group = group_of(ctx)?;

    let reply = run_blocking(ctx, move |service| {
        let outcome = service.vote(vote, &actor, &text, group)?;
        Ok(service.render(&actor, &outcome))
    })
    .await?;

    match reply {
        Some(reply) => send_reply(ctx, reply).await,
        None => Ok(()),
    }
}
