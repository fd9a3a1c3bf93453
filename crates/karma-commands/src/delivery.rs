//! Reply delivery with bounded retries.

use crate::framework::{Context, Error};
use karma_common::KarmaError;
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;
use tracing::{debug, warn};

/// Upper bound for a single retry delay.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Delays between attempts: `base_ms`, doubled per retry, capped.
pub fn retry_delays(base_ms: u64, retries: usize) -> impl Iterator<Item = Duration> {
    // ExponentialBackoff yields factor * 2^n starting at n = 1.
    let first = Duration::from_millis(base_ms).min(MAX_RETRY_DELAY);
    let backoff = ExponentialBackoff::from_millis(2)
        .factor(base_ms)
        .max_delay(MAX_RETRY_DELAY);
    std::iter::once(first).chain(backoff).take(retries)
}

/// Sends `text` to the invoking channel, retrying transient failures.
pub async fn send_reply(ctx: Context<'_>, text: String) -> Result<(), Error> {
    let bot = &ctx.data().config.bot;
    let strategy = retry_delays(bot.retry_base_ms, bot.delivery_retries);

    let text = text.as_str();

    Retry::spawn(strategy, || async move {
        ctx.say(text.to_string()).await.map(|_| ()).map_err(|e| {
            warn!(channel = %ctx.channel_id(), error = %e, "Reply delivery failed");
            e
        })
    })
    .await
    .map_err(|e| KarmaError::transport("failed to deliver reply", e))?;

    debug!(channel = %ctx.channel_id(), "Reply delivered");
    Ok(())
}
