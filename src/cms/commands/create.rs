use crate::assembly::apply_auto_slug;
use crate::commands::{CmdMessage, CmdResult};
use crate::context::OpContext;
use crate::editor::TextEditor;
use crate::error::{Result, ResultExt};
use crate::form::{FormOutcome, PostForm};
use crate::model::{PostDraft, PostInput};
use crate::store::PostStore;
use tracing::info;

use super::helpers::author_content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOptions {
    /// Author content in the external editor instead of taking `input.content`.
    pub use_editor: bool,
    /// Fill a missing slug from the title.
    pub auto_slug: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            use_editor: false,
            auto_slug: true,
        }
    }
}

pub fn run<S: PostStore>(
    store: &S,
    ctx: &OpContext,
    editor: &dyn TextEditor,
    input: &PostInput,
    opts: CreateOptions,
) -> Result<CmdResult> {
    create(store, ctx, editor, input, opts).op("create post")
}

/// Collects the fields through `form` first. A cancelled form creates
/// nothing and is not an error.
pub fn run_interactive<S: PostStore>(
    store: &S,
    ctx: &OpContext,
    editor: &dyn TextEditor,
    form: &dyn PostForm,
    initial: &PostInput,
    opts: CreateOptions,
) -> Result<CmdResult> {
    match form.collect(initial, opts.use_editor).op("create post")? {
        FormOutcome::Cancelled => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info("Post creation cancelled."));
            Ok(result)
        }
        FormOutcome::Submitted(input) => run(store, ctx, editor, &input, opts),
    }
}

fn create<S: PostStore>(
    store: &S,
    ctx: &OpContext,
    editor: &dyn TextEditor,
    input: &PostInput,
    opts: CreateOptions,
) -> Result<CmdResult> {
    let mut draft = PostDraft::from(input);

    if opts.use_editor {
        let content = author_content(editor, &input.title, &input.author, &input.content, false)?;
        draft.content = Some(content);
    }
    if opts.auto_slug {
        draft = apply_auto_slug(draft);
    }

    let post = store.create(ctx, &draft)?;
    info!(id = post.id, slug = ?post.slug, "post created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Post created (id {}): {}",
        post.id, post.title
    )));
    Ok(result.with_affected_posts(vec![post]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::fixtures::ScriptedEditor;
    use crate::error::CmsError;
    use crate::store::memory::InMemoryStore;

    struct StubForm(FormOutcome);

    impl PostForm for StubForm {
        fn collect(&self, _initial: &PostInput, _content_from_editor: bool) -> Result<FormOutcome> {
            Ok(self.0.clone())
        }
    }

    fn input(title: &str, content: &str, author: &str, slug: &str) -> PostInput {
        PostInput {
            title: title.into(),
            content: content.into(),
            author: author.into(),
            slug: slug.into(),
        }
    }

    fn no_editor() -> ScriptedEditor {
        ScriptedEditor::unavailable()
    }

    #[test]
    fn creates_post_with_null_mapping() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        let opts = CreateOptions {
            auto_slug: false,
            ..CreateOptions::default()
        };
        let result = run(&store, &ctx, &no_editor(), &input("T", "", "", ""), opts).unwrap();

        let post = &result.affected_posts[0];
        assert_eq!(post.title, "T");
        assert_eq!(post.content, None);
        assert_eq!(post.author, None);
        assert_eq!(post.slug, None);
        assert_eq!(store.get_by_id(&ctx, post.id).unwrap(), *post);
    }

    #[test]
    fn auto_slug_fills_missing_slug() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        let result = run(
            &store,
            &ctx,
            &no_editor(),
            &input("Hello World", "body", "", ""),
            CreateOptions::default(),
        )
        .unwrap();
        assert_eq!(result.affected_posts[0].slug.as_deref(), Some("hello-world"));
    }

    #[test]
    fn explicit_slug_wins() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        let result = run(
            &store,
            &ctx,
            &no_editor(),
            &input("Hello World", "", "", "custom"),
            CreateOptions::default(),
        )
        .unwrap();
        assert_eq!(result.affected_posts[0].slug.as_deref(), Some("custom"));
    }

    #[test]
    fn duplicate_slug_is_wrapped_constraint_violation() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        let opts = CreateOptions::default();
        run(&store, &ctx, &no_editor(), &input("Same", "", "", ""), opts).unwrap();
        let err = run(&store, &ctx, &no_editor(), &input("Same", "", "", ""), opts).unwrap_err();

        assert!(err.to_string().starts_with("create post: "));
        assert!(matches!(err.root(), CmsError::ConstraintViolation(_)));
    }

    #[test]
    fn editor_content_is_used() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        let editor = ScriptedEditor::returning("From the editor");
        let opts = CreateOptions {
            use_editor: true,
            ..CreateOptions::default()
        };
        let result = run(&store, &ctx, &editor, &input("T", "", "Ann", "t"), opts).unwrap();

        assert_eq!(
            result.affected_posts[0].content.as_deref(),
            Some("From the editor")
        );
        assert_eq!(
            editor.calls.borrow()[0],
            ("T".into(), "Ann".into(), "".into(), false)
        );
    }

    #[test]
    fn editor_failures_create_nothing() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        let opts = CreateOptions {
            use_editor: true,
            ..CreateOptions::default()
        };

        let unavailable = run(&store, &ctx, &no_editor(), &input("T", "", "", ""), opts).unwrap_err();
        assert!(matches!(unavailable.root(), CmsError::EditorUnavailable(_)));

        let empty = ScriptedEditor::returning("");
        let err = run(&store, &ctx, &empty, &input("T", "", "", ""), opts).unwrap_err();
        assert!(matches!(err.root(), CmsError::ContentEmpty(_)));

        let failing = ScriptedEditor::failing("editor failed");
        let err = run(&store, &ctx, &failing, &input("T", "", "", ""), opts).unwrap_err();
        assert!(err.to_string().contains("failed to edit content"));

        assert!(store.list(&ctx, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn cancelled_form_is_a_noop() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        let result = run_interactive(
            &store,
            &ctx,
            &no_editor(),
            &StubForm(FormOutcome::Cancelled),
            &PostInput::default(),
            CreateOptions::default(),
        )
        .unwrap();

        assert!(result.affected_posts.is_empty());
        assert_eq!(result.messages.len(), 1);
        assert!(store.list(&ctx, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn submitted_form_creates_post() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        let form = StubForm(FormOutcome::Submitted(input("Form Post", "text", "Bo", "")));
        let result = run_interactive(
            &store,
            &ctx,
            &no_editor(),
            &form,
            &PostInput::default(),
            CreateOptions::default(),
        )
        .unwrap();

        let post = &result.affected_posts[0];
        assert_eq!(post.author.as_deref(), Some("Bo"));
        assert_eq!(post.slug.as_deref(), Some("form-post"));
    }
}
