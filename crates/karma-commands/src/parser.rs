//! Command grammar and parsing.
//!
//! Every command is `<prefix><name>`, optionally followed by `@<botname>`
//! (chat platforms append it in group chats), then its arguments. The
//! argument grammar is declared per command in [`Command::grammar`].

use karma_common::Handle;
use std::fmt;

/// Commands understood by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `/start`
    Start,
    /// `/help`
    Help,
    /// `/upvote @username`
    Upvote,
    /// `/downvote @username`
    Downvote,
    /// `/rating @username`
    Rating,
    /// `/top5 [local|global]`
    Top,
}

/// Argument grammar of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// No arguments; anything after the command is ignored.
    Free,
    /// Exactly one handle: `@` followed by letters, digits or underscores.
    Handle,
    /// Nothing, `local` or `global`.
    Scope,
}

impl Command {
    /// All commands.
    pub const ALL: [Self; 6] = [
        Self::Start,
        Self::Help,
        Self::Upvote,
        Self::Downvote,
        Self::Rating,
        Self::Top,
    ];

    /// Name as typed after the prefix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
            Self::Rating => "rating",
            Self::Top => "top5",
        }
    }

    /// Argument grammar.
    pub const fn grammar(self) -> Grammar {
        match self {
            Self::Start | Self::Help => Grammar::Free,
            Self::Upvote | Self::Downvote | Self::Rating => Grammar::Handle,
            Self::Top => Grammar::Scope,
        }
    }

    /// Looks a command up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Leaderboard scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// The chat the command was sent in.
    #[default]
    Local,
    /// Summed over every chat.
    Global,
}

impl From<Scope> for karma_i18n::BoardScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Local => Self::Local,
            Scope::Global => Self::Global,
        }
    }
}

/// Result of parsing a command's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    /// Arguments match the grammar.
    Success(T),
    /// The command matched but its arguments did not.
    UsageError,
    /// The text is not this command.
    NoMatch,
}

/// Parses raw message text against the command grammar.
#[derive(Debug, Clone)]
pub struct CommandParser {
    prefix: String,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new("/")
    }
}

impl CommandParser {
    /// Creates a parser for commands starting with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Which command, if any, `text` invokes.
    pub fn command_of(&self, text: &str) -> Option<Command> {
        let rest = text.strip_prefix(self.prefix.as_str())?;
        let end = rest
            .find(|c: char| c.is_whitespace() || c == Handle::SIGIL)
            .unwrap_or(rest.len());
        let command = Command::from_name(&rest[..end])?;
        self.arguments(command, text).map(|_| command)
    }

    /// Splits the arguments following `command`, or `None` if `text` is a
    /// different command.
    fn arguments<'t>(&self, command: Command, text: &'t str) -> Option<Vec<&'t str>> {
        let rest = text
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix(command.name())?;

        let rest = match rest.strip_prefix(Handle::SIGIL) {
            Some(addressed) => {
                let end = addressed.find(char::is_whitespace).unwrap_or(addressed.len());
                let bot = &addressed[..end];
                if bot.is_empty() || !bot.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return None;
                }
                &addressed[end..]
            }
            None => rest,
        };

        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(rest.split_whitespace().collect())
    }

    /// Parses the single handle argument of `command`.
    pub fn parse_handle(&self, command: Command, text: &str) -> ParseOutcome<Handle> {
        match self.arguments(command, text).as_deref() {
            None => ParseOutcome::NoMatch,
            Some([token]) => Handle::parse(token).map_or(ParseOutcome::UsageError, ParseOutcome::Success),
            Some(_) => ParseOutcome::UsageError,
        }
    }

    /// Parses the optional scope argument of `command`.
    pub fn parse_scope(&self, command: Command, text: &str) -> ParseOutcome<Scope> {
        match self.arguments(command, text).as_deref() {
            None => ParseOutcome::NoMatch,
            Some([]) => ParseOutcome::Success(Scope::Local),
            Some([token]) if token.eq_ignore_ascii_case("local") => ParseOutcome::Success(Scope::Local),
            Some([token]) if token.eq_ignore_ascii_case("global") => ParseOutcome::Success(Scope::Global),
            Some(_) => ParseOutcome::UsageError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(command: Command, text: &str) -> ParseOutcome<String> {
        match CommandParser::default().parse_handle(command, text) {
            ParseOutcome::Success(h) => ParseOutcome::Success(h.to_string()),
            ParseOutcome::UsageError => ParseOutcome::UsageError,
            ParseOutcome::NoMatch => ParseOutcome::NoMatch,
        }
    }

    #[test]
    fn test_parses_single_handle() {
        assert_eq!(
            handle(Command::Upvote, "/upvote @bob"),
            ParseOutcome::Success("@bob".to_string())
        );
        assert_eq!(
            handle(Command::Rating, "/rating   @Bob_42  "),
            ParseOutcome::Success("@Bob_42".to_string())
        );
    }

    #[test]
    fn test_missing_or_malformed_target_is_usage_error() {
        assert_eq!(handle(Command::Upvote, "/upvote"), ParseOutcome::UsageError);
        assert_eq!(handle(Command::Upvote, "/upvote   "), ParseOutcome::UsageError);
        assert_eq!(handle(Command::Upvote, "/upvote notahandle"), ParseOutcome::UsageError);
        assert_eq!(handle(Command::Upvote, "/upvote @"), ParseOutcome::UsageError);
        assert_eq!(handle(Command::Upvote, "/upvote @bob!"), ParseOutcome::UsageError);
    }

    #[test]
    fn test_more_than_one_token_is_usage_error() {
        assert_eq!(handle(Command::Downvote, "/downvote @bob @carol"), ParseOutcome::UsageError);
        assert_eq!(handle(Command::Downvote, "/downvote @bob thanks"), ParseOutcome::UsageError);
    }

    #[test]
    fn test_other_commands_do_not_match() {
        assert_eq!(handle(Command::Upvote, "/downvote @bob"), ParseOutcome::NoMatch);
        assert_eq!(handle(Command::Upvote, "/upvoter @bob"), ParseOutcome::NoMatch);
        assert_eq!(handle(Command::Upvote, "upvote @bob"), ParseOutcome::NoMatch);
        assert_eq!(handle(Command::Upvote, " /upvote @bob"), ParseOutcome::NoMatch);
    }

    #[test]
    fn test_bot_suffix_is_accepted() {
        assert_eq!(
            handle(Command::Upvote, "/upvote@karma_bot @bob"),
            ParseOutcome::Success("@bob".to_string())
        );
        assert_eq!(handle(Command::Upvote, "/upvote@karma_bot"), ParseOutcome::UsageError);
        assert_eq!(handle(Command::Upvote, "/upvote@ @bob"), ParseOutcome::NoMatch);
    }

    #[test]
    fn test_custom_prefix() {
        let parser = CommandParser::new("!");
        assert!(matches!(
            parser.parse_handle(Command::Rating, "!rating @bob"),
            ParseOutcome::Success(h) if h == "@bob"
        ));
        assert_eq!(parser.parse_handle(Command::Rating, "/rating @bob"), ParseOutcome::NoMatch);
    }

    #[test]
    fn test_scope_grammar() {
        let parser = CommandParser::default();
        assert_eq!(parser.parse_scope(Command::Top, "/top5"), ParseOutcome::Success(Scope::Local));
        assert_eq!(parser.parse_scope(Command::Top, "/top5 local"), ParseOutcome::Success(Scope::Local));
        assert_eq!(parser.parse_scope(Command::Top, "/top5 GLOBAL"), ParseOutcome::Success(Scope::Global));
        assert_eq!(parser.parse_scope(Command::Top, "/top5 galaxy"), ParseOutcome::UsageError);
        assert_eq!(parser.parse_scope(Command::Top, "/top5 local global"), ParseOutcome::UsageError);
        assert_eq!(parser.parse_scope(Command::Top, "/top10"), ParseOutcome::NoMatch);
    }

    #[test]
    fn test_command_of() {
        let parser = CommandParser::default();
        assert_eq!(parser.command_of("/upvote @bob"), Some(Command::Upvote));
        assert_eq!(parser.command_of("/upvote@karma_bot @bob"), Some(Command::Upvote));
        assert_eq!(parser.command_of("/top5"), Some(Command::Top));
        assert_eq!(parser.command_of("/start"), Some(Command::Start));
        assert_eq!(parser.command_of("/unknown"), None);
        assert_eq!(parser.command_of("hello there"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_name(command.name()), Some(command));
        }
    }
}
