//! Table layout and upgrades.
//!
//! Version 1 is the layout written by the earlier bot: the three tables with
//! no uniqueness on `karma(username, group_id)`. Version 2 adds that index.

use crate::error::{StoreError, StoreResult};
use rusqlite::Connection;
use tracing::{info, warn};

pub const SCHEMA_VERSION: i64 = 2;

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS groups (
        group_id INTEGER PRIMARY KEY
    );

    CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY,
        first_name TEXT,
        last_name TEXT
    );

    CREATE TABLE IF NOT EXISTS karma (
        karma INTEGER NOT NULL DEFAULT 0,
        username TEXT NOT NULL,
        group_id INTEGER NOT NULL,
        FOREIGN KEY(group_id) REFERENCES groups(group_id),
        FOREIGN KEY(username) REFERENCES users(username)
    );
";

pub fn schema_version(conn: &Connection) -> StoreResult<i64> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Creates missing tables and brings an older database up to date.
pub fn migrate(conn: &mut Connection) -> StoreResult<()> {
    let tx = conn.transaction()?;
    let version = schema_version(&tx)?;
    if version > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }
    tx.execute_batch(CREATE_TABLES)?;

    if version < 2 {
        // Racing check-then-insert in the old bot could leave duplicate
        // rows. Every increment updated all of them, so the oldest one
        // carries the score.
        let removed = tx.execute(
            "DELETE FROM karma WHERE rowid NOT IN (
                SELECT MIN(rowid) FROM karma GROUP BY username, group_id
            )",
            [],
        )?;
        if removed > 0 {
            warn!(removed, "dropped duplicate karma rows while upgrading schema");
        }
        tx.execute_batch(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_karma_user_group
                ON karma(username, group_id);
             CREATE INDEX IF NOT EXISTS idx_karma_group_score
                ON karma(group_id, karma);",
        )?;
    }
    if version != SCHEMA_VERSION {
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        info!(from = version, to = SCHEMA_VERSION, "karma schema upgraded");
    }

    tx.commit()?;
    Ok(())
}
