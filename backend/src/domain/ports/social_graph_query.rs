//! Driving port for raw follower graph reads.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Domain use-case port for follower and following sets.
#[async_trait]
pub trait SocialGraphQuery: Send + Sync {
    /// Ids of users following `user_id`.
    async fn follower_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, Error>;

    /// Ids of users `user_id` follows.
    async fn following_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, Error>;

    /// Whether `viewer` follows `target`.
    async fn is_following(&self, viewer: &UserId, target: &UserId) -> Result<bool, Error>;
}
