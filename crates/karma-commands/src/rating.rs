//! `/rating`.

use crate::delivery::send_reply;
use crate::framework::{actor_of, group_of, message_text, run_blocking, Context, Error};

/// Shows a user's karma in this chat.
#[poise::command(prefix_command)]
pub async fn rating(ctx: Context<'_>, #[rest] _target: Option<String>) -> Result<(), Error> {
    let actor = actor_of(ctx);
    let text = message_text(ctx);
    let group = group_of(ctx)?;

    let reply = run_blocking(ctx, move |service| service.handle_rating(&actor, &text, group)).await?;
    send_reply(ctx, reply).await
}
