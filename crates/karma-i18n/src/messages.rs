//! Typed accessors for every reply the bot sends.

use crate::loader::LocaleBundle;
use fluent_bundle::FluentArgs;
use karma_common::KarmaResult;

/// Leaderboard scope, as rendered in replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardScope {
    /// The current chat.
    Local,
    /// All chats.
    Global,
}

impl BoardScope {
    const fn key(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Global => "global",
        }
    }
}

/// The reply catalogue.
#[derive(Debug)]
pub struct Messages {
    bundle: LocaleBundle,
    prefix: String,
}

impl Messages {
    /// Loads the catalogue for `language`; hints mention commands with `prefix`.
    pub fn load(language: &str, prefix: impl Into<String>) -> KarmaResult<Self> {
        Ok(Self::new(LocaleBundle::load(language)?, prefix))
    }

    /// Wraps an already loaded bundle.
    pub fn new(bundle: LocaleBundle, prefix: impl Into<String>) -> Self {
        Self {
            bundle,
            prefix: prefix.into(),
        }
    }

    /// Command prefix used in hints.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn args<'a>(&'a self, pairs: &[(&'static str, String)]) -> FluentArgs<'a> {
        let mut args = FluentArgs::new();
        args.set("prefix", self.prefix.as_str());
        for (key, value) in pairs {
            args.set(*key, value.clone());
        }
        args
    }

    fn render(&self, id: &str, pairs: &[(&'static str, String)]) -> String {
        self.bundle.format(id, Some(&self.args(pairs)))
    }

    /// Reply to `/start`.
    pub fn greeting(&self) -> String {
        self.render("start-greeting", &[])
    }

    /// Reply to `/help`.
    pub fn help(&self) -> String {
        self.render("help-text", &[])
    }

    /// Usage hint for `command`, addressed to `actor`.
    pub fn usage(&self, command: &str, actor: &str) -> String {
        self.render(&format!("usage-{command}"), &[("actor", actor.to_string())])
    }

    /// Rejection of a vote on oneself.
    pub fn self_vote(&self, actor: &str) -> String {
        self.render("self-vote", &[("actor", actor.to_string())])
    }

    /// Reply when a command failed for reasons other than its input.
    pub fn command_failed(&self, actor: &str) -> String {
        self.render("command-failed", &[("actor", actor.to_string())])
    }

    /// Score lookup result.
    pub fn karma_is(&self, handle: &str, score: i64) -> String {
        self.render(
            "karma-is",
            &[("handle", handle.to_string()), ("score", score.to_string())],
        )
    }

    /// Score lookup for a handle without a record.
    pub fn no_karma_yet(&self, handle: &str) -> String {
        self.render("karma-none", &[("handle", handle.to_string())])
    }

    /// Confirmation after a vote.
    pub fn vote_confirmed(&self, handle: &str, score: i64) -> String {
        self.render(
            "karma-now",
            &[("handle", handle.to_string()), ("score", score.to_string())],
        )
    }

    /// Leaderboard header.
    pub fn leaderboard_title(&self, scope: BoardScope, count: usize) -> String {
        self.render(
            "leaderboard-title",
            &[("scope", scope.key().to_string()), ("count", count.to_string())],
        )
    }

    /// One leaderboard line; `rank` starts at 1.
    pub fn leaderboard_line(&self, rank: usize, handle: &str, score: i64) -> String {
        self.render(
            "leaderboard-line",
            &[
                ("rank", rank.to_string()),
                ("handle", handle.to_string()),
                ("score", score.to_string()),
            ],
        )
    }

    /// Leaderboard with no entries.
    pub fn leaderboard_empty(&self, scope: BoardScope) -> String {
        self.render("leaderboard-empty", &[("scope", scope.key().to_string())])
    }
}
