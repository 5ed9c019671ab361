use crate::commands::{CmdMessage, CmdResult};
use crate::context::OpContext;
use crate::error::{Result, ResultExt};
use crate::model::PostSelector;
use crate::store::PostStore;
use tracing::info;

/// Deletes the selected post. Deleting something that isn't there succeeds
/// with a warning.
pub fn run<S: PostStore>(store: &S, ctx: &OpContext, selector: &PostSelector) -> Result<CmdResult> {
    let removed = match selector {
        PostSelector::Id(id) => store.delete_by_id(ctx, *id),
        PostSelector::Slug(slug) => store.delete_by_slug(ctx, slug),
    }
    .op("delete post")?;

    let mut result = CmdResult::default();
    if removed {
        info!(%selector, "post deleted");
        result.add_message(CmdMessage::success(format!("Post deleted ({})", selector)));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "No post matched {}, nothing deleted",
            selector
        )));
    }
    Ok(result)
}
