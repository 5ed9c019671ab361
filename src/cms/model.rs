use crate::error::{CmsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A persisted blog post.
///
/// Instances handed out by a store are detached copies: re-fetch to observe
/// later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// The writable fields of this post, as a draft.
    pub fn draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Post fields before the store assigns identity and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub slug: Option<String>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Raw field values as typed by a user. Empty means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub author: String,
    pub slug: String,
}

/// Field replacements for an update. `None` leaves the field alone;
/// `Some("")` is an explicit value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOverrides {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl FieldOverrides {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author.is_none()
    }
}

/// Identifies a single post either by numeric id or by slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostSelector {
    Id(i64),
    Slug(String),
}

impl PostSelector {
    /// Builds a selector from an optional id and slug. Exactly one must be set.
    pub fn from_parts(id: Option<i64>, slug: Option<String>) -> Result<Self> {
        match (id, slug) {
            (Some(id), None) => Ok(PostSelector::Id(id)),
            (None, Some(slug)) => Ok(PostSelector::Slug(slug)),
            (None, None) => Err(CmsError::InvalidSelector(
                "either --id or --slug must be set to identify the post".to_string(),
            )),
            (Some(_), Some(_)) => Err(CmsError::InvalidSelector(
                "cannot use both --id and --slug together".to_string(),
            )),
        }
    }
}

impl fmt::Display for PostSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostSelector::Id(id) => write!(f, "id {}", id),
            PostSelector::Slug(slug) => write!(f, "slug '{}'", slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_requires_exactly_one_identifier() {
        assert_eq!(
            PostSelector::from_parts(Some(3), None).unwrap(),
            PostSelector::Id(3)
        );
        assert_eq!(
            PostSelector::from_parts(None, Some("a".into())).unwrap(),
            PostSelector::Slug("a".into())
        );
        assert!(matches!(
            PostSelector::from_parts(None, None),
            Err(CmsError::InvalidSelector(_))
        ));
        assert!(matches!(
            PostSelector::from_parts(Some(1), Some("a".into())),
            Err(CmsError::InvalidSelector(_))
        ));
    }

    #[test]
    fn selector_display() {
        assert_eq!(PostSelector::Id(4).to_string(), "id 4");
        assert_eq!(PostSelector::Slug("x-y".into()).to_string(), "slug 'x-y'");
    }

    #[test]
    fn draft_copies_writable_fields() {
        let now = Utc::now();
        let post = Post {
            id: 1,
            title: "T".into(),
            content: Some("C".into()),
            author: None,
            slug: Some("t".into()),
            created_at: now,
            updated_at: now,
        };
        let draft = post.draft();
        assert_eq!(draft, PostDraft::new("T").with_content("C").with_slug("t"));
    }
}
