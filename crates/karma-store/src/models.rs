//! Rows returned by the store.

use karma_common::{GroupId, Handle};
use serde::Serialize;

/// A user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique handle, including the leading `@`.
    pub handle: Handle,
    /// Display first name. Not populated by current flows.
    pub first_name: Option<String>,
    /// Display last name. Not populated by current flows.
    pub last_name: Option<String>,
}

/// A karma score for one (user, group) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KarmaRecord {
    /// Whose karma.
    pub handle: Handle,
    /// Where it was earned.
    pub group: GroupId,
    /// Net sum of all votes.
    pub karma: i64,
}

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// Ranked handle.
    pub handle: Handle,
    /// Score within the group, or summed over all groups.
    pub karma: i64,
}

/// Row counts, logged at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of users.
    pub users: u64,
    /// Number of groups.
    pub groups: u64,
    /// Number of karma records.
    pub karma_records: u64,
}
