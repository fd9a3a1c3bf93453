//! `/top5`.

use crate::delivery::send_reply;
use crate::framework::{actor_of, group_of, message_text, run_blocking, Context, Error};

/// Shows the leaderboard for this chat, or across all chats with `global`.
#[poise::command(prefix_command)]
pub async fn top5(ctx: Context<'_>, #[rest] _scope: Option<String>) -> Result<(), Error> {
    let actor = actor_of(ctx);
    let text = message_text(ctx);
    let group = group_of(ctx)?;

    let reply = run_blocking(ctx, move |service| service.handle_top(&actor, &text, group)).await?;
    send_reply(ctx, reply).await
}
