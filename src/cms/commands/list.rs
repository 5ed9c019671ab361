use crate::commands::CmdResult;
use crate::context::OpContext;
use crate::error::{Result, ResultExt};
use crate::store::PostStore;
use tracing::debug;

/// With `limit > 0`, newest first starting at `offset`. Otherwise every
/// post in id order and `offset` is ignored.
pub fn run<S: PostStore>(store: &S, ctx: &OpContext, limit: i64, offset: i64) -> Result<CmdResult> {
    let posts = store.list(ctx, limit, offset).op("list posts")?;
    debug!(count = posts.len(), limit, offset, "listed posts");
    Ok(CmdResult::default().with_listed_posts(posts))
}
