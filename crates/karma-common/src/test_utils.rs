//! Test utilities and shared fixtures for the Karma Bot workspace.
//!
//! Enabled for other crates through the `testing` feature.

use crate::types::{GroupId, Handle};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        // Another harness may already own the global subscriber.
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Builds a handle from a fixture literal, panicking on typos.
pub fn handle(raw: &str) -> Handle {
    Handle::parse(raw).unwrap_or_else(|e| panic!("bad fixture handle {raw}: {e}"))
}

/// Chat fixtures.
pub mod chat_fixtures {
    use super::*;

    /// The group used by the end-to-end scenarios.
    pub const fn test_group() -> GroupId {
        GroupId(100)
    }

    /// A second group, for checking per-group isolation.
    pub const fn other_group() -> GroupId {
        GroupId(-1_001_234_567_890)
    }

    /// Alice, Bob and Carol.
    pub fn test_handles() -> Vec<Handle> {
        ["@alice", "@bob", "@carol"].into_iter().map(handle).collect()
    }
}

/// Temporary database locations that clean up after themselves.
#[cfg(any(test, feature = "tempfile"))]
pub mod db_fixtures {
    /// A temp directory plus the path of a database file inside it.
    pub fn temp_db_path() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("karma.db");
        (dir, path)
    }
}

/// Property-based testing utilities using proptest.
#[cfg(any(test, feature = "proptest"))]
pub mod property_testing {
    use crate::types::{GroupId, Handle};
    use proptest::prelude::*;

    /// Strategy for valid handles.
    pub fn handle_strategy() -> impl Strategy<Value = Handle> {
        r"@[a-zA-Z0-9_]{1,32}".prop_map(|s| Handle::parse(&s).expect("strategy yields valid handles"))
    }

    /// Strategy for group ids, including negative Telegram-style ids.
    pub fn group_id_strategy() -> impl Strategy<Value = GroupId> {
        any::<i64>().prop_map(GroupId)
    }

    /// Strategy for a sequence of upvotes and downvotes.
    pub fn vote_sequence_strategy(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(prop_oneof![Just(1i64), Just(-1i64)], 0..max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_fixture_handles_are_distinct() {
        let handles = chat_fixtures::test_handles();
        assert_eq!(handles.len(), 3);
        assert_ne!(handles[0], handles[1]);
        assert_ne!(chat_fixtures::test_group(), chat_fixtures::other_group());
    }

    #[test]
    #[should_panic(expected = "bad fixture handle")]
    fn test_handle_fixture_rejects_typos() {
        let _ = handle("alice");
    }

    proptest! {
        #[test]
        fn test_property_handles_are_valid(h in property_testing::handle_strategy()) {
            prop_assert!(Handle::is_valid(h.as_str()));
        }

        #[test]
        fn test_property_votes_are_unit(votes in property_testing::vote_sequence_strategy(64)) {
            prop_assert!(votes.iter().all(|v| v.abs() == 1));
        }
    }
}
