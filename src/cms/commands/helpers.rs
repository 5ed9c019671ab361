use crate::context::OpContext;
use crate::editor::TextEditor;
use crate::error::{CmsError, Result};
use crate::model::{Post, PostSelector};
use crate::store::PostStore;
use tracing::debug;

/// Fetches the post a selector points at.
pub fn resolve<S: PostStore>(store: &S, ctx: &OpContext, selector: &PostSelector) -> Result<Post> {
    match selector {
        PostSelector::Id(id) => store.get_by_id(ctx, *id),
        PostSelector::Slug(slug) => store.get_by_slug(ctx, slug),
    }
}

/// Has the editor author post content.
///
/// Fails with `EditorUnavailable` when the editor can't be found and with
/// `ContentEmpty` when nothing was written. Editor failures carry the
/// editor's description.
pub fn author_content(
    editor: &dyn TextEditor,
    title: &str,
    author: &str,
    existing: &str,
    is_update: bool,
) -> Result<String> {
    if !editor.is_available() {
        return Err(CmsError::EditorUnavailable(editor.describe()));
    }

    debug!(editor = %editor.describe(), is_update, "authoring content in editor");
    let content = editor
        .edit_content(title, author, existing, is_update)
        .map_err(|e| match e {
            CmsError::Editor(msg) => CmsError::Editor(format!("{} [{}]", msg, editor.describe())),
            other => other,
        })?;

    if content.is_empty() {
        return Err(CmsError::ContentEmpty(editor.describe()));
    }
    Ok(content)
}
