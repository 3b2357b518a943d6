//! Feed reads and the rate-limited post write path.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::enrichment::UserDirectory;
use crate::domain::ports::{
    DEFAULT_POST_WINDOW, FeedQuery, IdentityProvider, PostCommand, PostRepository,
    PostRepositoryError, RateLimitKey, RateLimiter, RateLimiterError,
};
use crate::domain::{
    Error, Post, PostContent, PostId, PostValidationError, PostWithAuthor, UserId,
};

/// Default size of the recent posts window.
pub const DEFAULT_RECENT_POSTS_LIMIT: usize = 100;

fn map_repository_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

fn map_limiter_error(error: RateLimiterError) -> Error {
    match error {
        RateLimiterError::Backend { message } => {
            Error::service_unavailable(format!("rate limiter unavailable: {message}"))
        }
    }
}

fn map_content_error(error: PostValidationError) -> Error {
    let code = match error {
        PostValidationError::EmptyContent => "empty_content",
        PostValidationError::ContentTooLong { .. } => "content_too_long",
    };
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": "content", "code": code }))
}

/// Rejection carrying the window length, rounded up to whole seconds, as
/// the longest the actor has to wait.
fn rate_limited(window: Duration) -> Error {
    let seconds = window.as_secs() + u64::from(window.subsec_nanos() > 0);
    Error::rate_limited("slow down").with_details(json!({ "retryAfterSeconds": seconds }))
}

/// Feed service implementing [`FeedQuery`] and [`PostCommand`].
pub struct FeedService<P: ?Sized, I: ?Sized, L: ?Sized> {
    posts: Arc<P>,
    directory: UserDirectory<I>,
    limiter: Arc<L>,
    clock: Arc<dyn Clock>,
    recent_limit: usize,
    rate_window: Duration,
}

impl<P: ?Sized, I: ?Sized, L: ?Sized> FeedService<P, I, L> {
    /// Create a feed service over its driven ports.
    pub fn new(
        posts: Arc<P>,
        directory: UserDirectory<I>,
        limiter: Arc<L>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            directory,
            limiter,
            clock,
            recent_limit: DEFAULT_RECENT_POSTS_LIMIT,
            rate_window: DEFAULT_POST_WINDOW,
        }
    }

    /// Override the number of posts returned by `list_recent_posts`.
    #[must_use]
    pub fn with_recent_limit(mut self, recent_limit: usize) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    /// Window reported to throttled actors. Should match the limiter's policy.
    #[must_use]
    pub fn with_rate_window(mut self, window: Duration) -> Self {
        self.rate_window = window;
        self
    }
}

#[async_trait]
impl<P, I, L> FeedQuery for FeedService<P, I, L>
where
    P: PostRepository + ?Sized,
    I: IdentityProvider + ?Sized,
    L: RateLimiter + ?Sized,
{
    async fn list_recent_posts(&self) -> Result<Vec<PostWithAuthor>, Error> {
        let posts = self
            .posts
            .list_recent(self.recent_limit)
            .await
            .map_err(map_repository_error)?;
        self.directory.enrich(posts).await
    }

    async fn get_post(&self, id: &PostId) -> Result<PostWithAuthor, Error> {
        let post = self
            .posts
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("post not found"))?;
        let mut enriched = self.directory.enrich(vec![post]).await?;
        enriched
            .pop()
            .ok_or_else(|| Error::internal("author not found"))
    }

    async fn list_posts_by_user(&self, user_id: &UserId) -> Result<Vec<PostWithAuthor>, Error> {
        let posts = self
            .posts
            .list_by_author(user_id)
            .await
            .map_err(map_repository_error)?;
        self.directory.enrich(posts).await
    }
}

#[async_trait]
impl<P, I, L> PostCommand for FeedService<P, I, L>
where
    P: PostRepository + ?Sized,
    I: IdentityProvider + ?Sized,
    L: RateLimiter + ?Sized,
{
    async fn create_post(&self, actor: &UserId, content: String) -> Result<Post, Error> {
        let content = PostContent::new(content).map_err(map_content_error)?;

        let decision = self
            .limiter
            .check_and_consume(&RateLimitKey::post_create(actor))
            .await
            .map_err(map_limiter_error)?;
        if !decision.allowed {
            info!(actor = %actor, "post rejected by rate limiter");
            return Err(rate_limited(self.rate_window));
        }

        let post = Post::new(actor.clone(), content, self.clock.utc());
        self.posts
            .insert(&post)
            .await
            .map_err(map_repository_error)?;
        Ok(post)
    }
}

#[cfg(test)]
#[path = "feed_service_tests.rs"]
mod tests;
