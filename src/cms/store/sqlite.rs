use super::{schema, PostStore};
use crate::context::OpContext;
use crate::error::{CmsError, Result};
use crate::model::{Post, PostDraft, PostSelector};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_DATABASE_PATH: &str = "./cms.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const BUSY_SLICE: Duration = Duration::from_millis(50);
const COLUMNS: &str = "id, title, content, author, slug, created_at, updated_at";

/// SQLite-backed post store.
///
/// Holds one connection behind a mutex; each call runs a single statement,
/// which SQLite applies atomically.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    location: String,
}

impl SqliteStore {
    /// Opens (or creates) the database at `url` and brings its schema up to
    /// date. Accepts plain paths and `sqlite://` URLs; empty means
    /// [`DEFAULT_DATABASE_PATH`].
    pub fn open(url: &str) -> Result<Self> {
        let location = database_path(url);
        let conn = Connection::open(Path::new(&location)).map_err(|e| {
            CmsError::StoreUnavailable(format!("cannot open database '{}': {}", location, e))
        })?;
        Self::init(conn, location)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CmsError::StoreUnavailable(format!("cannot open in-memory database: {}", e)))?;
        Self::init(conn, ":memory:".to_string())
    }

    fn init(mut conn: Connection, location: String) -> Result<Self> {
        let unavailable =
            |e: CmsError| CmsError::StoreUnavailable(format!("cannot initialize '{}': {}", location, e));

        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| unavailable(e.into()))?;
        schema::migrate(&mut conn).map_err(unavailable)?;

        debug!(location = %location, "database ready");
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Runs `f` on the connection once the context has been checked.
    ///
    /// While another connection holds the database lock, `f` is retried in
    /// short busy waits and the context is checked between attempts, so a
    /// cancel or an expired deadline ends the wait with its own error. A
    /// statement that failed as busy has written nothing.
    fn with_conn<T>(
        &self,
        ctx: &OpContext,
        f: impl Fn(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        ctx.check()?;
        let conn = self.lock()?;
        // Waiting on the lock may have used up the deadline.
        ctx.check()?;

        let give_up = Instant::now() + BUSY_TIMEOUT;
        loop {
            let left = give_up.saturating_duration_since(Instant::now());
            let wait = ctx.remaining().map_or(left, |r| r.min(left)).min(BUSY_SLICE);
            conn.busy_timeout(wait).map_err(classify)?;

            match f(&*conn) {
                Ok(value) => return Ok(value),
                Err(err) if err.sqlite_error_code() == Some(ErrorCode::DatabaseBusy) => {
                    ctx.check()?;
                    if Instant::now() >= give_up {
                        return Err(classify(err));
                    }
                    debug!(location = %self.location, "database busy, retrying");
                }
                Err(err) => return Err(classify(err)),
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CmsError::StoreUnavailable("database connection lock poisoned".to_string()))
    }
}

impl PostStore for SqliteStore {
    fn create(&self, ctx: &OpContext, draft: &PostDraft) -> Result<Post> {
        let now = encode_ts(&Utc::now());
        let slug = stored_slug(draft);
        let sql = format!(
            "INSERT INTO posts (title, content, author, slug, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             RETURNING {}",
            COLUMNS
        );

        let post = self
            .with_conn(ctx, |conn| {
                conn.query_row(
                    &sql,
                    params![draft.title, draft.content, draft.author, slug, now],
                    row_to_post,
                )
            })
            .map_err(|e| slug_conflict(e, slug))?;

        debug!(id = post.id, slug = ?post.slug, "post created");
        Ok(post)
    }

    fn get_by_id(&self, ctx: &OpContext, id: i64) -> Result<Post> {
        let sql = format!("SELECT {} FROM posts WHERE id = ?1", COLUMNS);
        self.with_conn(ctx, |conn| {
            conn.query_row(&sql, params![id], row_to_post).optional()
        })?
        .ok_or(CmsError::NotFound(PostSelector::Id(id)))
    }

    fn get_by_slug(&self, ctx: &OpContext, slug: &str) -> Result<Post> {
        if slug.is_empty() {
            ctx.check()?;
            return Err(CmsError::NotFound(PostSelector::Slug(String::new())));
        }
        let sql = format!("SELECT {} FROM posts WHERE slug = ?1", COLUMNS);
        self.with_conn(ctx, |conn| {
            conn.query_row(&sql, params![slug], row_to_post).optional()
        })?
        .ok_or_else(|| CmsError::NotFound(PostSelector::Slug(slug.to_string())))
    }

    fn update_by_id(&self, ctx: &OpContext, id: i64, draft: &PostDraft) -> Result<Post> {
        let now = encode_ts(&Utc::now());
        let slug = stored_slug(draft);
        let sql = format!(
            "UPDATE posts
             SET title = ?1, content = ?2, author = ?3, slug = ?4, updated_at = ?5
             WHERE id = ?6
             RETURNING {}",
            COLUMNS
        );

        let post = self
            .with_conn(ctx, |conn| {
                conn.query_row(
                    &sql,
                    params![draft.title, draft.content, draft.author, slug, now, id],
                    row_to_post,
                )
                .optional()
            })
            .map_err(|e| slug_conflict(e, slug))?
            .ok_or(CmsError::NotFound(PostSelector::Id(id)))?;

        debug!(id, "post updated");
        Ok(post)
    }

    /// Single-statement update keyed on the slug, so there is no window
    /// between resolving the slug and writing the row.
    fn update_by_slug(&self, ctx: &OpContext, slug: &str, draft: &PostDraft) -> Result<Post> {
        if slug.is_empty() {
            ctx.check()?;
            return Err(CmsError::NotFound(PostSelector::Slug(String::new())));
        }
        let now = encode_ts(&Utc::now());
        let new_slug = stored_slug(draft);
        let sql = format!(
            "UPDATE posts
             SET title = ?1, content = ?2, author = ?3, slug = ?4, updated_at = ?5
             WHERE slug = ?6
             RETURNING {}",
            COLUMNS
        );

        let post = self
            .with_conn(ctx, |conn| {
                conn.query_row(
                    &sql,
                    params![draft.title, draft.content, draft.author, new_slug, now, slug],
                    row_to_post,
                )
                .optional()
            })
            .map_err(|e| slug_conflict(e, new_slug))?
            .ok_or_else(|| CmsError::NotFound(PostSelector::Slug(slug.to_string())))?;

        debug!(id = post.id, slug, "post updated");
        Ok(post)
    }

    fn delete_by_id(&self, ctx: &OpContext, id: i64) -> Result<bool> {
        let removed =
            self.with_conn(ctx, |conn| conn.execute("DELETE FROM posts WHERE id = ?1", params![id]))?;
        debug!(id, removed, "delete by id");
        Ok(removed > 0)
    }

    fn delete_by_slug(&self, ctx: &OpContext, slug: &str) -> Result<bool> {
        if slug.is_empty() {
            ctx.check()?;
            return Ok(false);
        }
        let removed = self.with_conn(ctx, |conn| {
            conn.execute("DELETE FROM posts WHERE slug = ?1", params![slug])
        })?;
        debug!(slug, removed, "delete by slug");
        Ok(removed > 0)
    }

    fn list(&self, ctx: &OpContext, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let posts = if limit > 0 {
            let sql = format!(
                "SELECT {} FROM posts ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
                COLUMNS
            );
            self.with_conn(ctx, |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![limit, offset.max(0)], row_to_post)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })?
        } else {
            let sql = format!("SELECT {} FROM posts ORDER BY id ASC", COLUMNS);
            self.with_conn(ctx, |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], row_to_post)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })?
        };

        debug!(limit, offset, count = posts.len(), "listed posts");
        Ok(posts)
    }
}

/// Strips an optional `sqlite://` or `sqlite:` scheme; empty means the default path.
pub fn database_path(url: &str) -> String {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    if path.is_empty() {
        DEFAULT_DATABASE_PATH.to_string()
    } else {
        path.to_string()
    }
}

/// Fixed-width RFC 3339 so that text order matches time order.
pub fn encode_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author: row.get(3)?,
        slug: row.get(4)?,
        created_at: decode_ts(row, 5)?,
        updated_at: decode_ts(row, 6)?,
    })
}

// An empty slug is stored as NULL so it never takes part in uniqueness.
fn stored_slug(draft: &PostDraft) -> Option<&str> {
    draft.slug.as_deref().filter(|s| !s.is_empty())
}

fn slug_conflict(err: CmsError, slug: Option<&str>) -> CmsError {
    match (err, slug) {
        (CmsError::ConstraintViolation(_), Some(slug)) => {
            CmsError::ConstraintViolation(format!("slug '{}' is already used by another post", slug))
        }
        (err, _) => err,
    }
}

fn classify(err: rusqlite::Error) -> CmsError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => CmsError::ConstraintViolation(err.to_string()),
        Some(
            ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::SystemIoFailure
            | ErrorCode::ReadOnly,
        ) => CmsError::StoreUnavailable(err.to_string()),
        Some(ErrorCode::OperationInterrupted) => CmsError::Cancelled,
        _ => CmsError::Sqlite(err),
    }
}
