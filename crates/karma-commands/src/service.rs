//! Karma rules, independent of any chat platform.
//!
//! Adapters hand every command the actor's mention, the raw message text and
//! the chat's [`GroupId`]; the service parses, applies the rules against the
//! store and renders the reply (if any).

use crate::parser::{Command, CommandParser, ParseOutcome, Scope};
use karma_common::{truncate_string, GroupId, Handle, KarmaResult};
use karma_config::Config;
use karma_i18n::Messages;
use karma_store::{KarmaStore, LeaderboardEntry};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Longest message excerpt written to logs.
const LOGGED_TEXT_CHARS: usize = 64;

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    /// +1
    Up,
    /// -1
    Down,
}

impl Vote {
    /// Score change applied by this vote.
    pub const fn delta(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// Command that casts this vote.
    pub const fn command(self) -> Command {
        match self {
            Self::Up => Command::Upvote,
            Self::Down => Command::Downvote,
        }
    }
}

/// Tunables taken from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Reply with the new score after a successful vote.
    pub confirm_votes: bool,
    /// Entries per leaderboard.
    pub leaderboard_size: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            confirm_votes: false,
            leaderboard_size: 5,
        }
    }
}

impl From<&Config> for ServiceOptions {
    fn from(config: &Config) -> Self {
        Self {
            confirm_votes: config.replies.confirm_votes,
            leaderboard_size: config.leaderboard.size,
        }
    }
}

/// What a command did, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `/start`
    Greeting,
    /// `/help`
    Help,
    /// A vote was recorded; `karma` is the new score.
    Voted {
        /// Who received the vote.
        target: Handle,
        /// Up or down.
        vote: Vote,
        /// Score after the vote.
        karma: i64,
    },
    /// Arguments did not match the command's grammar. Nothing changed.
    UsageError(Command),
    /// The actor targeted themselves. Nothing changed.
    SelfVote,
    /// Score of a handle in the group.
    Rating {
        /// Whose score.
        handle: Handle,
        /// The score, possibly zero.
        karma: i64,
    },
    /// The handle has no record in the group.
    NoKarmaYet(Handle),
    /// Highest scores, best first.
    Leaderboard {
        /// Which board.
        scope: Scope,
        /// At most `leaderboard_size` entries.
        entries: Vec<LeaderboardEntry>,
    },
}

/// The command handlers.
pub struct KarmaService {
    store: Arc<KarmaStore>,
    messages: Messages,
    parser: CommandParser,
    options: ServiceOptions,
}

impl fmt::Debug for KarmaService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KarmaService")
            .field("parser", &self.parser)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl KarmaService {
    /// Creates a service; commands are recognized with the messages' prefix.
    pub fn new(store: Arc<KarmaStore>, messages: Messages, options: ServiceOptions) -> Self {
        let parser = CommandParser::new(messages.prefix());
        Self {
            store,
            messages,
            parser,
            options,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &KarmaStore {
        &self.store
    }

    /// The command parser.
    pub const fn parser(&self) -> &CommandParser {
        &self.parser
    }

    /// Applies a vote from `actor` parsed out of `text`.
    pub fn vote(&self, vote: Vote, actor: &str, text: &str, group: GroupId) -> KarmaResult<Outcome> {
        let command = vote.command();
        let ParseOutcome::Success(target) = self.parser.parse_handle(command, text) else {
            debug!(%command, actor, text = %truncate_string(text, LOGGED_TEXT_CHARS), "Vote rejected: bad arguments");
            return Ok(Outcome::UsageError(command));
        };

        if target == actor {
            debug!(%command, actor, "Vote rejected: self vote");
            return Ok(Outcome::SelfVote);
        }

        let karma = self.store.apply_vote(&target, group, vote.delta())?;
        info!(%command, actor, target = %target, %group, karma, "Vote recorded");
        Ok(Outcome::Voted {
            target,
            vote,
            karma,
        })
    }

    /// `/upvote @username`
    pub fn upvote(&self, actor: &str, text: &str, group: GroupId) -> KarmaResult<Outcome> {
        self.vote(Vote::Up, actor, text, group)
    }

    /// `/downvote @username`
    pub fn downvote(&self, actor: &str, text: &str, group: GroupId) -> KarmaResult<Outcome> {
        self.vote(Vote::Down, actor, text, group)
    }

    /// `/rating @username`. Read only.
    pub fn rating(&self, actor: &str, text: &str, group: GroupId) -> KarmaResult<Outcome> {
        let ParseOutcome::Success(handle) = self.parser.parse_handle(Command::Rating, text) else {
            return Ok(Outcome::UsageError(Command::Rating));
        };
        debug!(actor, handle = %handle, %group, "Rating lookup");

        Ok(match self.store.get_karma(&handle, group)? {
            Some(karma) => Outcome::Rating { handle, karma },
            None => Outcome::NoKarmaYet(handle),
        })
    }

    /// `/top5 [local|global]`. Read only.
    pub fn top(&self, actor: &str, text: &str, group: GroupId) -> KarmaResult<Outcome> {
        let ParseOutcome::Success(scope) = self.parser.parse_scope(Command::Top, text) else {
            return Ok(Outcome::UsageError(Command::Top));
        };
        debug!(actor, ?scope, %group, "Leaderboard requested");

        let limit = self.options.leaderboard_size;
        let entries = match scope {
            Scope::Local => self.store.top_in_group(group, limit)?,
            Scope::Global => self.store.top_global(limit)?,
        };
        Ok(Outcome::Leaderboard { scope, entries })
    }

    /// Turns an outcome into reply text; `None` means stay silent.
    pub fn render(&self, actor: &str, outcome: &Outcome) -> Option<String> {
        let m = &self.messages;
        match outcome {
            Outcome::Greeting => Some(m.greeting()),
            Outcome::Help => Some(m.help()),
            Outcome::Voted { target, karma, .. } => self
                .options
                .confirm_votes
                .then(|| m.vote_confirmed(target.as_str(), *karma)),
            Outcome::UsageError(command) => Some(m.usage(command.name(), actor)),
            Outcome::SelfVote => Some(m.self_vote(actor)),
            Outcome::Rating { handle, karma } => Some(m.karma_is(handle.as_str(), *karma)),
            Outcome::NoKarmaYet(handle) => Some(m.no_karma_yet(handle.as_str())),
            Outcome::Leaderboard { scope, entries } => {
                let scope = (*scope).into();
                if entries.is_empty() {
                    return Some(m.leaderboard_empty(scope));
                }
                let mut lines = vec![m.leaderboard_title(scope, entries.len())];
                lines.extend(entries.iter().enumerate().map(|(i, entry)| {
                    m.leaderboard_line(i + 1, entry.handle.as_str(), entry.karma)
                }));
                Some(lines.join("\n"))
            }
        }
    }

    /// Reply to `/start`.
    pub fn handle_start(&self, actor: &str) -> String {
        debug!(actor, "Greeting");
        self.render(actor, &Outcome::Greeting).unwrap_or_default()
    }

    /// Reply to `/help`.
    pub fn handle_help(&self, actor: &str) -> String {
        debug!(actor, "Help requested");
        self.render(actor, &Outcome::Help).unwrap_or_default()
    }

    /// Handles `/upvote`; `None` when the vote succeeded silently.
    pub fn handle_upvote(&self, actor: &str, text: &str, group: GroupId) -> KarmaResult<Option<String>> {
        let outcome = self.upvote(actor, text, group)?;
        Ok(self.render(actor, &outcome))
    }

    /// Handles `/downvote`; `None` when the vote succeeded silently.
    pub fn handle_downvote(&self, actor: &str, text: &str, group: GroupId) -> KarmaResult<Option<String>> {
        let outcome = self.downvote(actor, text, group)?;
        Ok(self.render(actor, &outcome))
    }

    /// Handles `/rating`.
    pub fn handle_rating(&self, actor: &str, text: &str, group: GroupId) -> KarmaResult<String> {
        let outcome = self.rating(actor, text, group)?;
        Ok(self.render(actor, &outcome).unwrap_or_default())
    }

    /// Handles `/top5`.
    pub fn handle_top(&self, actor: &str, text: &str, group: GroupId) -> KarmaResult<String> {
        let outcome = self.top(actor, text, group)?;
        Ok(self.render(actor, &outcome).unwrap_or_default())
    }

    /// Routes any message to its command. `Ok(None)` for non-commands and
    /// silent successes.
    pub fn handle_message(&self, actor: &str, text: &str, group: GroupId) -> KarmaResult<Option<String>> {
        let Some(command) = self.parser.command_of(text) else {
            return Ok(None);
        };

        match command {
            Command::Start => Ok(Some(self.handle_start(actor))),
            Command::Help => Ok(Some(self.handle_help(actor))),
            Command::Upvote => self.handle_upvote(actor, text, group),
            Command::Downvote => self.handle_downvote(actor, text, group),
            Command::Rating => self.handle_rating(actor, text, group).map(Some),
            Command::Top => self.handle_top(actor, text, group).map(Some),
        }
    }

    /// Reply telling `actor` their command could not be completed.
    pub fn failure_reply(&self, actor: &str) -> String {
        self.messages.command_failed(actor)
    }

    /// Logs a failure that escaped a command handler. Never replies.
    pub fn handle_unrecognized_error(&self, context: &str, error: impl fmt::Display) {
        warn!(context, error = %error, "Update caused error");
    }
}
