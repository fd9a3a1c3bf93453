//! The karma store: users, groups and per-group karma scores in SQLite.

use crate::error::{StoreError, StoreResult};
use crate::models::{KarmaRecord, LeaderboardEntry, StoreStats, User};
use crate::schema;
use karma_common::{GroupId, Handle};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Durable karma storage backed by one SQLite connection.
///
/// Every method takes the connection lock for its full statement sequence,
/// which serializes all writes, including writes to the same key.
pub struct KarmaStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for KarmaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KarmaStore").finish_non_exhaustive()
    }
}

impl KarmaStore {
    /// Opens (or creates) the database file at `path` and upgrades its schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Opening karma database");
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Inserts the user if absent. Idempotent.
    pub fn ensure_user(&self, handle: &Handle) -> StoreResult<()> {
        insert_user(&self.lock_conn(), handle)
    }

    /// Inserts the group if absent. Idempotent.
    pub fn ensure_group(&self, group: GroupId) -> StoreResult<()> {
        insert_group(&self.lock_conn(), group)
    }

    /// Inserts a zero score for (handle, group) if absent. Idempotent.
    ///
    /// The user and group must already exist; otherwise the foreign keys
    /// reject the insert.
    pub fn ensure_karma(&self, handle: &Handle, group: GroupId) -> StoreResult<()> {
        insert_karma(&self.lock_conn(), handle, group)
    }

    /// Adds `delta` to an existing score and returns the new score.
    pub fn adjust_karma(&self, handle: &Handle, group: GroupId, delta: i64) -> StoreResult<i64> {
        add_karma(&self.lock_conn(), handle, group, delta)
    }

    /// Runs the full ensure sequence and the adjustment under one lock.
    ///
    /// Each statement commits on its own; a failure part way leaves valid
    /// rows behind (at worst a zero score).
    pub fn apply_vote(&self, handle: &Handle, group: GroupId, delta: i64) -> StoreResult<i64> {
        let conn = self.lock_conn();
        insert_user(&conn, handle)?;
        insert_group(&conn, group)?;
        insert_karma(&conn, handle, group)?;
        add_karma(&conn, handle, group, delta)
    }

    /// Current score, or `None` if the pair was never ensured.
    pub fn get_karma(&self, handle: &Handle, group: GroupId) -> StoreResult<Option<i64>> {
        Ok(self.get_record(handle, group)?.map(|record| record.karma))
    }

    /// The full karma record for (handle, group), if any.
    pub fn get_record(&self, handle: &Handle, group: GroupId) -> StoreResult<Option<KarmaRecord>> {
        let conn = self.lock_conn();
        let karma = conn
            .query_row(
                "SELECT karma FROM karma WHERE username = ?1 AND group_id = ?2",
                params![handle.as_str(), group.0],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(karma.map(|karma| KarmaRecord {
            handle: handle.clone(),
            group,
            karma,
        }))
    }

    /// Looks up a user row.
    pub fn get_user(&self, handle: &Handle) -> StoreResult<Option<User>> {
        let conn = self.lock_conn();
        let user = conn
            .query_row(
                "SELECT username, first_name, last_name FROM users WHERE username = ?1",
                params![handle.as_str()],
                |row| {
                    Ok(User {
                        handle: handle_column(row, 0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Whether the group row exists.
    pub fn group_exists(&self, group: GroupId) -> StoreResult<bool> {
        let conn = self.lock_conn();
        let found = conn
            .query_row(
                "SELECT 1 FROM groups WHERE group_id = ?1",
                params![group.0],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Highest scores in one group, ties broken by handle.
    pub fn top_in_group(&self, group: GroupId, limit: usize) -> StoreResult<Vec<LeaderboardEntry>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare_cached(
            "SELECT username, karma FROM karma
             WHERE group_id = ?1
             ORDER BY karma DESC, username ASC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![group.0, sql_limit(limit)], leaderboard_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Highest scores summed over every group, ties broken by handle.
    ///
    /// Totals saturate at the `i64` bounds.
    pub fn top_global(&self, limit: usize) -> StoreResult<Vec<LeaderboardEntry>> {
        let conn = self.lock_conn();
        // SQLite's SUM() fails on overflow, so the totals are added up here.
        let mut stmt = conn.prepare_cached("SELECT username, karma FROM karma")?;
        let mut totals: BTreeMap<Handle, i64> = BTreeMap::new();
        for row in stmt.query_map([], leaderboard_row)? {
            let entry = row?;
            let total = totals.entry(entry.handle).or_insert(0);
            *total = total.saturating_add(entry.karma);
        }

        let mut board: Vec<LeaderboardEntry> = totals
            .into_iter()
            .map(|(handle, karma)| LeaderboardEntry { handle, karma })
            .collect();
        board.sort_by(|a, b| b.karma.cmp(&a.karma).then_with(|| a.handle.cmp(&b.handle)));
        board.truncate(limit);
        Ok(board)
    }

    /// Row counts for each table.
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let conn = self.lock_conn();
        let count = |table: &str| -> StoreResult<u64> {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(u64::try_from(n).unwrap_or_default())
        };
        Ok(StoreStats {
            users: count("users")?,
            groups: count("groups")?,
            karma_records: count("karma")?,
        })
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> StoreResult<i64> {
        schema::schema_version(&self.lock_conn())
    }
}

fn insert_user(conn: &Connection, handle: &Handle) -> StoreResult<()> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO users (username) VALUES (?1)",
        params![handle.as_str()],
    )?;
    if inserted > 0 {
        debug!(%handle, "Created user");
    }
    Ok(())
}

fn insert_group(conn: &Connection, group: GroupId) -> StoreResult<()> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO groups (group_id) VALUES (?1)",
        params![group.0],
    )?;
    if inserted > 0 {
        debug!(%group, "Created group");
    }
    Ok(())
}

fn insert_karma(conn: &Connection, handle: &Handle, group: GroupId) -> StoreResult<()> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO karma (username, group_id, karma) VALUES (?1, ?2, 0)",
        params![handle.as_str(), group.0],
    )?;
    if inserted > 0 {
        debug!(%handle, %group, "Created karma record");
    }
    Ok(())
}

fn add_karma(conn: &Connection, handle: &Handle, group: GroupId, delta: i64) -> StoreResult<i64> {
    let current: i64 = conn
        .query_row(
            "SELECT karma FROM karma WHERE username = ?1 AND group_id = ?2",
            params![handle.as_str(), group.0],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| StoreError::MissingRecord {
            handle: handle.clone(),
            group,
        })?;

    // SQLite silently turns an overflowing integer into a REAL.
    let updated = current.checked_add(delta).ok_or_else(|| StoreError::Overflow {
        handle: handle.clone(),
        group,
    })?;

    conn.execute(
        "UPDATE karma SET karma = ?3 WHERE username = ?1 AND group_id = ?2",
        params![handle.as_str(), group.0, updated],
    )?;
    debug!(%handle, %group, delta, karma = updated, "Adjusted karma");
    Ok(updated)
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn handle_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Handle> {
    let raw: String = row.get(idx)?;
    Handle::parse(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn leaderboard_row(row: &Row<'_>) -> rusqlite::Result<LeaderboardEntry> {
    Ok(LeaderboardEntry {
        handle: handle_column(row, 0)?,
        karma: row.get(1)?,
    })
}
