//! Driving port for establishing a session.
//!
//! Inbound adapters exchange an identity-provider session token for the id
//! of the user it belongs to, then keep that id in their own session store.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the owner of `token`, or `unauthorized`.
    async fn authenticate(&self, token: &str) -> Result<UserId, Error>;
}
