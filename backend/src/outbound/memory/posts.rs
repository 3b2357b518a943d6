//! In-memory `PostRepository`.

use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{Post, PostId, UserId};

/// Vector-backed post store with the same ordering as the SQL adapter.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Post>>, PostRepositoryError> {
        self.posts
            .lock()
            .map_err(|_| PostRepositoryError::query("post store lock poisoned"))
    }
}

/// Newest first, ties broken by id descending.
fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut posts = self.lock()?;
        if posts.iter().any(|existing| existing.id == post.id) {
            return Err(PostRepositoryError::query("duplicate post id"));
        }
        posts.push(post.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, PostRepositoryError> {
        let mut posts = self.lock()?.clone();
        posts.sort_by(newest_first);
        posts.truncate(limit);
        Ok(posts)
    }

    async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Post>, PostRepositoryError> {
        let mut posts: Vec<Post> = self
            .lock()?
            .iter()
            .filter(|post| &post.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(newest_first);
        Ok(posts)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        Ok(self.lock()?.iter().find(|post| &post.id == id).cloned())
    }
}
