//! Driving port for the rate-limited post write path.

use async_trait::async_trait;

use crate::domain::{Error, Post, UserId};

/// Domain use-case port for creating posts.
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Validate `content`, consume a rate-limit permit for `actor`, and
    /// persist the post.
    ///
    /// Fails with `invalid_request` for content outside 1..=280 characters
    /// and `rate_limited` once the actor's window is exhausted. Neither
    /// failure writes a row.
    async fn create_post(&self, actor: &UserId, content: String) -> Result<Post, Error>;
}
