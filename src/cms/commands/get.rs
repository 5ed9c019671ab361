use crate::commands::CmdResult;
use crate::context::OpContext;
use crate::error::{Result, ResultExt};
use crate::model::PostSelector;
use crate::store::PostStore;

use super::helpers::resolve;

pub fn run<S: PostStore>(store: &S, ctx: &OpContext, selector: &PostSelector) -> Result<CmdResult> {
    let post = resolve(store, ctx, selector).op("get post")?;
    Ok(CmdResult::default().with_listed_posts(vec![post]))
}
