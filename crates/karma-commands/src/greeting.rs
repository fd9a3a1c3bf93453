//! `/start` and `/help`.

use crate::delivery::send_reply;
use crate::framework::{actor_of, Context, Error};

/// Greets the user.
#[poise::command(prefix_command)]
pub async fn start(ctx: Context<'_>, #[rest] _arguments: Option<String>) -> Result<(), Error> {
    let reply = ctx.data().service.handle_start(&actor_of(ctx));
    send_reply(ctx, reply).await
}

/// Lists the available commands.
#[poise::command(prefix_command)]
pub async fn help(ctx: Context<'_>, #[rest] _arguments: Option<String>) -> Result<(), Error> {
    let reply = ctx.data().service.handle_help(&actor_of(ctx));
    send_reply(ctx, reply).await
}
