//! Embedded schema migrations, tracked with SQLite's `user_version` pragma.

use crate::error::{CmsError, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Ordered migrations. Entry `n` moves the schema from version `n` to `n + 1`.
const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS posts (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT NOT NULL,
        content     TEXT,
        author      TEXT,
        slug        TEXT UNIQUE,
        created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%f', 'now') || '000000Z'),
        updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%f', 'now') || '000000Z')
    );",
    "CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts (created_at);",
];

pub fn current_version(conn: &Connection) -> Result<usize> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    usize::try_from(version)
        .map_err(|_| CmsError::StoreUnavailable(format!("invalid schema version {}", version)))
}

pub fn latest_version() -> usize {
    MIGRATIONS.len()
}

/// Applies every migration newer than the database's recorded version.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let from = current_version(conn)?;
    if from > MIGRATIONS.len() {
        return Err(CmsError::StoreUnavailable(format!(
            "database schema version {} is newer than this binary supports ({})",
            from,
            MIGRATIONS.len()
        )));
    }
    if from == MIGRATIONS.len() {
        debug!(version = from, "schema up to date");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (idx, sql) in MIGRATIONS.iter().enumerate().skip(from) {
        debug!(version = idx + 1, "applying migration");
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", MIGRATIONS.len() as i64)?;
    tx.commit()?;

    info!(from, to = MIGRATIONS.len(), "schema migrated");
    Ok(())
}
