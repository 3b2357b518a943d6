//! Driving port for reading the post feed.
//!
//! Every post returned here is enriched with its author; an author the
//! identity provider cannot resolve fails the whole call.

use async_trait::async_trait;

use crate::domain::{Error, PostId, PostWithAuthor, UserId};

/// Domain use-case port for feed and per-user post listings.
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Most recent posts, newest first, capped by the configured window.
    async fn list_recent_posts(&self) -> Result<Vec<PostWithAuthor>, Error>;

    /// One post, or `not_found`.
    async fn get_post(&self, id: &PostId) -> Result<PostWithAuthor, Error>;

    /// Every post by `user_id`, newest first.
    async fn list_posts_by_user(&self, user_id: &UserId) -> Result<Vec<PostWithAuthor>, Error>;
}
