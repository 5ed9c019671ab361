use super::PostStore;
use crate::context::OpContext;
use crate::error::{CmsError, Result};
use crate::model::{Post, PostDraft, PostSelector};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    posts: BTreeMap<i64, Post>,
}

impl State {
    fn slug_taken(&self, slug: Option<&str>, except: Option<i64>) -> bool {
        let Some(slug) = slug else {
            return false;
        };
        self.posts
            .values()
            .any(|p| p.slug.as_deref() == Some(slug) && Some(p.id) != except)
    }

    fn id_for_slug(&self, slug: &str) -> Option<i64> {
        if slug.is_empty() {
            return None;
        }
        self.posts
            .values()
            .find(|p| p.slug.as_deref() == Some(slug))
            .map(|p| p.id)
    }

    fn update(&mut self, id: i64, draft: &PostDraft) -> Result<Post> {
        let slug = stored_slug(draft);
        if !self.posts.contains_key(&id) {
            return Err(CmsError::NotFound(PostSelector::Id(id)));
        }
        if self.slug_taken(slug, Some(id)) {
            return Err(slug_conflict(slug));
        }
        let post = self
            .posts
            .get_mut(&id)
            .ok_or(CmsError::NotFound(PostSelector::Id(id)))?;
        post.title = draft.title.clone();
        post.content = draft.content.clone();
        post.author = draft.author.clone();
        post.slug = slug.map(str::to_string);
        post.updated_at = Utc::now();
        Ok(post.clone())
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, ctx: &OpContext) -> Result<MutexGuard<'_, State>> {
        ctx.check()?;
        self.state
            .lock()
            .map_err(|_| CmsError::StoreUnavailable("in-memory store lock poisoned".to_string()))
    }
}

impl PostStore for InMemoryStore {
    fn create(&self, ctx: &OpContext, draft: &PostDraft) -> Result<Post> {
        let mut state = self.lock(ctx)?;
        let slug = stored_slug(draft);
        if state.slug_taken(slug, None) {
            return Err(slug_conflict(slug));
        }

        state.last_id += 1;
        let now = Utc::now();
        let post = Post {
            id: state.last_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            author: draft.author.clone(),
            slug: slug.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    fn get_by_id(&self, ctx: &OpContext, id: i64) -> Result<Post> {
        self.lock(ctx)?
            .posts
            .get(&id)
            .cloned()
            .ok_or(CmsError::NotFound(PostSelector::Id(id)))
    }

    fn get_by_slug(&self, ctx: &OpContext, slug: &str) -> Result<Post> {
        let state = self.lock(ctx)?;
        state
            .id_for_slug(slug)
            .and_then(|id| state.posts.get(&id).cloned())
            .ok_or_else(|| CmsError::NotFound(PostSelector::Slug(slug.to_string())))
    }

    fn update_by_id(&self, ctx: &OpContext, id: i64, draft: &PostDraft) -> Result<Post> {
        self.lock(ctx)?.update(id, draft)
    }

    fn update_by_slug(&self, ctx: &OpContext, slug: &str, draft: &PostDraft) -> Result<Post> {
        let mut state = self.lock(ctx)?;
        let id = state
            .id_for_slug(slug)
            .ok_or_else(|| CmsError::NotFound(PostSelector::Slug(slug.to_string())))?;
        state.update(id, draft)
    }

    fn delete_by_id(&self, ctx: &OpContext, id: i64) -> Result<bool> {
        Ok(self.lock(ctx)?.posts.remove(&id).is_some())
    }

    fn delete_by_slug(&self, ctx: &OpContext, slug: &str) -> Result<bool> {
        let mut state = self.lock(ctx)?;
        match state.id_for_slug(slug) {
            Some(id) => Ok(state.posts.remove(&id).is_some()),
            None => Ok(false),
        }
    }

    fn list(&self, ctx: &OpContext, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let state = self.lock(ctx)?;
        // BTreeMap iteration is already ascending by id.
        let mut posts: Vec<Post> = state.posts.values().cloned().collect();
        if limit <= 0 {
            return Ok(posts);
        }

        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(posts.into_iter().skip(offset).take(limit).collect())
    }
}

fn stored_slug(draft: &PostDraft) -> Option<&str> {
    draft.slug.as_deref().filter(|s| !s.is_empty())
}

fn slug_conflict(slug: Option<&str>) -> CmsError {
    CmsError::ConstraintViolation(format!(
        "slug '{}' is already used by another post",
        slug.unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_sqlite_semantics() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();

        let a = store
            .create(&ctx, &PostDraft::new("A").with_slug("a"))
            .unwrap();
        assert!(matches!(
            store.create(&ctx, &PostDraft::new("B").with_slug("a")),
            Err(CmsError::ConstraintViolation(_))
        ));
        assert!(store.get_by_slug(&ctx, "").unwrap_err().is_not_found());
        assert!(!store.delete_by_id(&ctx, 100).unwrap());

        let updated = store
            .update_by_slug(&ctx, "a", &PostDraft::new("A2").with_slug("a"))
            .unwrap();
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.created_at, a.created_at);
        assert!(updated.updated_at >= a.updated_at);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        let first = store.create(&ctx, &PostDraft::new("1")).unwrap();
        store.delete_by_id(&ctx, first.id).unwrap();
        let second = store.create(&ctx, &PostDraft::new("2")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn list_pages_newest_first() {
        let store = InMemoryStore::new();
        let ctx = OpContext::background();
        for i in 1..=4 {
            store
                .create(&ctx, &PostDraft::new(format!("P{}", i)))
                .unwrap();
        }
        let titles: Vec<String> = store
            .list(&ctx, 2, 1)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["P3", "P2"]);
        assert_eq!(store.list(&ctx, 0, 0).unwrap()[0].title, "P1");
    }
}
