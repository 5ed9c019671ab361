//! # Storage Layer
//!
//! The [`PostStore`] trait is the only way posts reach durable storage. The
//! rest of the crate works against the trait so command logic can be tested
//! without a database file.
//!
//! ## Implementations
//!
//! - [`sqlite::SqliteStore`]: production store on a single SQLite connection
//!   - one `posts` table, schema applied by [`schema`] on open
//!   - slug uniqueness enforced by a unique index
//!
//! - [`memory::InMemoryStore`]: same semantics over a `BTreeMap`, for tests
//!
//! ## Semantics shared by every backend
//!
//! - `create` stamps `created_at == updated_at == now` and assigns the id.
//! - A non-null slug already used by another post is a
//!   [`CmsError::ConstraintViolation`](crate::error::CmsError::ConstraintViolation).
//! - Lookups and updates of a missing post return `NotFound`.
//! - Deletes of a missing post succeed and report `false`.
//! - `list` with `limit > 0` pages newest-first by `created_at`; otherwise it
//!   returns every post by ascending id and ignores `offset`.
//!
//! Stores take `&self` and are `Send + Sync`: construct one per process and
//! share it. There is no transaction spanning several calls.

use crate::context::OpContext;
use crate::error::Result;
use crate::model::{Post, PostDraft};

pub mod memory;
pub mod schema;
pub mod sqlite;

pub trait PostStore: Send + Sync {
    /// Persist a new post and return it with id and timestamps assigned.
    fn create(&self, ctx: &OpContext, draft: &PostDraft) -> Result<Post>;

    fn get_by_id(&self, ctx: &OpContext, id: i64) -> Result<Post>;

    /// Look up by slug. An empty slug never matches.
    fn get_by_slug(&self, ctx: &OpContext, slug: &str) -> Result<Post>;

    /// Overwrite the writable fields of a post and refresh `updated_at`.
    fn update_by_id(&self, ctx: &OpContext, id: i64, draft: &PostDraft) -> Result<Post>;

    /// Update the post currently holding `slug`, resolving and writing in
    /// one step.
    fn update_by_slug(&self, ctx: &OpContext, slug: &str, draft: &PostDraft) -> Result<Post>;

    /// Remove a post permanently. Returns whether a row was removed.
    fn delete_by_id(&self, ctx: &OpContext, id: i64) -> Result<bool>;

    fn delete_by_slug(&self, ctx: &OpContext, slug: &str) -> Result<bool>;

    fn list(&self, ctx: &OpContext, limit: i64, offset: i64) -> Result<Vec<Post>>;
}
