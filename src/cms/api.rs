//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for
//! post operations, whatever UI sits in front of it.
//!
//! The facade turns raw identifier arguments into a [`PostSelector`],
//! carries the editor chosen at startup, and dispatches to
//! `commands/*.rs`. It does no printing and holds no business logic.
//!
//! `CmsApi<S: PostStore>` is generic over the backend:
//! - Production: `CmsApi<SqliteStore>`
//! - Testing: `CmsApi<InMemoryStore>`

use crate::commands;
use crate::context::OpContext;
use crate::editor::TextEditor;
use crate::error::Result;
use crate::form::PostForm;
use crate::model::{PostInput, PostSelector};
use crate::store::PostStore;

/// The main API facade for cms operations.
pub struct CmsApi<S: PostStore> {
    store: S,
    editor: Box<dyn TextEditor>,
}

impl<S: PostStore> CmsApi<S> {
    pub fn new(store: S, editor: Box<dyn TextEditor>) -> Self {
        Self { store, editor }
    }

    pub fn create_post(
        &self,
        ctx: &OpContext,
        input: &PostInput,
        opts: CreateOptions,
    ) -> Result<commands::CmdResult> {
        commands::create::run(&self.store, ctx, self.editor.as_ref(), input, opts)
    }

    pub fn create_post_interactive(
        &self,
        ctx: &OpContext,
        form: &dyn PostForm,
        initial: &PostInput,
        opts: CreateOptions,
    ) -> Result<commands::CmdResult> {
        commands::create::run_interactive(&self.store, ctx, self.editor.as_ref(), form, initial, opts)
    }

    pub fn get_post(
        &self,
        ctx: &OpContext,
        id: Option<i64>,
        slug: Option<String>,
    ) -> Result<commands::CmdResult> {
        let selector = PostSelector::from_parts(id, slug)?;
        commands::get::run(&self.store, ctx, &selector)
    }

    pub fn update_post(
        &self,
        ctx: &OpContext,
        id: Option<i64>,
        slug: Option<String>,
        update: &PostUpdate,
    ) -> Result<commands::CmdResult> {
        let selector = PostSelector::from_parts(id, slug)?;
        commands::update::run(&self.store, ctx, self.editor.as_ref(), &selector, update)
    }

    pub fn delete_post(
        &self,
        ctx: &OpContext,
        id: Option<i64>,
        slug: Option<String>,
    ) -> Result<commands::CmdResult> {
        let selector = PostSelector::from_parts(id, slug)?;
        commands::delete::run(&self.store, ctx, &selector)
    }

    pub fn list_posts(&self, ctx: &OpContext, limit: i64, offset: i64) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, ctx, limit, offset)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::create::CreateOptions;
pub use commands::update::PostUpdate;
pub use commands::{CmdMessage, CmdResult, MessageLevel};
