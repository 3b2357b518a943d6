//! Driving port for follow and unfollow.
//!
//! Both operations are idempotent and return the resolved target so the
//! caller can render it without a second lookup.

use async_trait::async_trait;

use crate::domain::{Error, UserCondensed, UserId, Username};

/// Domain use-case port for mutating the follower graph.
#[async_trait]
pub trait SocialGraphCommand: Send + Sync {
    /// Make `follower` follow `target`. Following yourself is rejected.
    async fn follow_user(
        &self,
        follower: &UserId,
        target: &Username,
    ) -> Result<UserCondensed, Error>;

    /// Remove the edge `follower -> target` if present.
    async fn unfollow_user(
        &self,
        follower: &UserId,
        target: &Username,
    ) -> Result<UserCondensed, Error>;
}
