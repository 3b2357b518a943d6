//! Port for the follower edge set.
//!
//! Edge existence is the only follow state. Id listings return the most
//! recently created edges first.

use async_trait::async_trait;

use crate::domain::{FollowEdge, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by follower repository adapters.
    pub enum FollowerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "follower repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "follower repository query failed: {message}",
    }
}

/// Port for mutating and reading follower edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowerRepository: Send + Sync {
    /// Insert the edge unless it already exists.
    ///
    /// Returns `true` when a new edge was created.
    async fn insert_edge(&self, edge: &FollowEdge) -> Result<bool, FollowerRepositoryError>;

    /// Delete the edge if it exists.
    ///
    /// Returns `true` when an edge was removed.
    async fn delete_edge(&self, edge: &FollowEdge) -> Result<bool, FollowerRepositoryError>;

    /// Whether the edge exists.
    async fn edge_exists(&self, edge: &FollowEdge) -> Result<bool, FollowerRepositoryError>;

    /// Ids of every user following `user_id`.
    async fn follower_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, FollowerRepositoryError>;

    /// Ids of every user `user_id` follows.
    async fn following_ids(&self, user_id: &UserId)
    -> Result<Vec<UserId>, FollowerRepositoryError>;
}
