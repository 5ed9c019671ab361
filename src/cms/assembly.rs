//! # Post Assembly
//!
//! Pure transformations between raw user input and post drafts. Nothing here
//! touches storage or fails; consequences such as a duplicate slug surface
//! later, when the draft reaches a [`PostStore`](crate::store::PostStore).
//!
//! - [`build_from_input`]: raw strings to a draft, empty strings become null
//! - [`merge_update`]: existing post plus explicit overrides
//! - [`generate_slug`]: URL-friendly slug from a title

use crate::model::{FieldOverrides, Post, PostDraft, PostInput};

/// Maps an empty string to `None` and anything else to `Some` verbatim.
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Builds a draft from raw strings. The title is kept as-is, even when empty.
pub fn build_from_input(title: &str, content: &str, author: &str, slug: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        content: non_empty(content),
        author: non_empty(author),
        slug: non_empty(slug),
    }
}

impl From<&PostInput> for PostDraft {
    fn from(input: &PostInput) -> Self {
        build_from_input(&input.title, &input.content, &input.author, &input.slug)
    }
}

/// Merges explicit overrides onto an existing post.
///
/// Only fields present in `overrides` change. The slug always carries over.
pub fn merge_update(existing: &Post, overrides: &FieldOverrides) -> PostDraft {
    let mut draft = existing.draft();
    if let Some(title) = &overrides.title {
        draft.title = title.clone();
    }
    if let Some(content) = &overrides.content {
        draft.content = non_empty(content);
    }
    if let Some(author) = &overrides.author {
        draft.author = non_empty(author);
    }
    draft
}

/// Derives a slug from a title.
///
/// Whitespace runs become a single hyphen, then only ASCII lowercase letters,
/// digits and hyphens survive. Repeated hyphens collapse and the result is
/// trimmed of hyphens at both ends.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());

    for c in title.chars() {
        let c = if c.is_whitespace() {
            '-'
        } else {
            c.to_ascii_lowercase()
        };

        if c == '-' {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        }
    }

    slug.trim_matches('-').to_string()
}

/// Fills an absent slug from the title. Leaves it absent when the title has
/// no slug-worthy characters.
pub fn apply_auto_slug(mut draft: PostDraft) -> PostDraft {
    if draft.slug.is_none() {
        draft.slug = non_empty(&generate_slug(&draft.title));
    }
    draft
}
