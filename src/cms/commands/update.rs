use crate::assembly::{merge_update, non_empty};
use crate::commands::{CmdMessage, CmdResult};
use crate::context::OpContext;
use crate::editor::TextEditor;
use crate::error::{CmsError, Result, ResultExt};
use crate::model::{FieldOverrides, PostSelector};
use crate::store::PostStore;
use tracing::info;

use super::helpers::{author_content, resolve};

/// What the caller wants changed. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub overrides: FieldOverrides,
    /// Author new content in the editor. Takes precedence over `overrides.content`.
    pub use_editor: bool,
    /// Rename the slug. `Some("")` clears it.
    pub new_slug: Option<String>,
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && !self.use_editor && self.new_slug.is_none()
    }
}

pub fn run<S: PostStore>(
    store: &S,
    ctx: &OpContext,
    editor: &dyn TextEditor,
    selector: &PostSelector,
    update: &PostUpdate,
) -> Result<CmdResult> {
    apply(store, ctx, editor, selector, update).op("update post")
}

fn apply<S: PostStore>(
    store: &S,
    ctx: &OpContext,
    editor: &dyn TextEditor,
    selector: &PostSelector,
    update: &PostUpdate,
) -> Result<CmdResult> {
    if update.is_empty() {
        return Err(CmsError::Api(
            "at least one field must be specified to update (--title, --content, --author, --editor or --new-slug)"
                .to_string(),
        ));
    }

    let existing = resolve(store, ctx, selector)?;

    let mut overrides = update.overrides.clone();
    if update.use_editor {
        // Seed the template with the values the post will end up with.
        let title = overrides.title.as_deref().unwrap_or(&existing.title);
        let author = match &overrides.author {
            Some(author) => author.as_str(),
            None => existing.author.as_deref().unwrap_or_default(),
        };
        let existing_content = existing.content.as_deref().unwrap_or_default();
        let content = author_content(editor, title, author, existing_content, true)?;
        overrides.content = Some(content);
    }

    let mut draft = merge_update(&existing, &overrides);
    if let Some(slug) = &update.new_slug {
        draft.slug = non_empty(slug);
    }

    let post = match selector {
        PostSelector::Id(id) => store.update_by_id(ctx, *id, &draft)?,
        PostSelector::Slug(slug) => store.update_by_slug(ctx, slug, &draft)?,
    };
    info!(id = post.id, "post updated");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Post updated (id {}): {}",
        post.id, post.title
    )));
    Ok(result.with_affected_posts(vec![post]))
}
