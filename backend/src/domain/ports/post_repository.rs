//! Port for post persistence.
//!
//! Listing operations return posts newest first, ties broken by id
//! descending, so callers can rely on a total order.

use async_trait::async_trait;

use crate::domain::{Post, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "post repository query failed: {message}",
    }
}

/// Port for writing and reading posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Return at most `limit` of the most recent posts.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, PostRepositoryError>;

    /// Return every post written by `author_id`.
    async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Post>, PostRepositoryError>;

    /// Find a post by id.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError>;
}
