//! Driving port for profile pages.

use async_trait::async_trait;

use crate::domain::{Error, UserDetailed, UserId, Username};

/// Domain use-case port for reading a user's profile.
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Resolve `username` and attach social graph data as seen by `viewer`.
    ///
    /// Anonymous viewers see both relationship flags as `false`.
    async fn get_user_profile(
        &self,
        viewer: Option<&UserId>,
        username: &Username,
    ) -> Result<UserDetailed, Error>;
}
