//! Shared utility functions.

use crate::types::Handle;

/// Truncates a string to at most `max_chars` characters, appending an ellipsis.
///
/// Counts characters rather than bytes so message text with multibyte
/// characters never splits inside a code point.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Builds the `@`-prefixed form of a platform username.
///
/// Usernames that already carry the sigil are returned unchanged.
pub fn mention(username: &str) -> String {
    if username.starts_with(Handle::SIGIL) {
        username.to_string()
    } else {
        format!("{}{username}", Handle::SIGIL)
    }
}
