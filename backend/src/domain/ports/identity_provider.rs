//! Port for the external identity provider.
//!
//! The provider owns users and sessions. Batch lookups may return fewer users
//! than requested; callers decide whether a gap is fatal.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider could not be reached or answered with a server error.
        Unavailable { message: String } =>
            "identity provider unavailable: {message}",
        /// The provider refused the request.
        Rejected { message: String } =>
            "identity provider rejected request: {message}",
        /// The provider answered with a payload that could not be decoded.
        Decode { message: String } =>
            "identity provider response invalid: {message}",
    }
}

/// Read-only access to identity provider users and sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch up to `limit` users whose ids appear in `ids`.
    async fn users_by_ids(
        &self,
        ids: &[UserId],
        limit: usize,
    ) -> Result<Vec<User>, IdentityProviderError>;

    /// Fetch the user holding `username`, if any.
    async fn user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, IdentityProviderError>;

    /// Resolve an active session token to its owner.
    async fn session_user(&self, token: &str) -> Result<Option<UserId>, IdentityProviderError>;
}

/// In-memory identity provider for development and tests.
///
/// # Examples
/// ```
/// use murmur::domain::ports::FixtureIdentityProvider;
///
/// let provider = FixtureIdentityProvider::demo();
/// assert!(provider.user_count() >= 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct FixtureIdentityProvider {
    users: Vec<User>,
    sessions: HashMap<String, UserId>,
}

impl FixtureIdentityProvider {
    /// Build a provider holding `users` and no sessions.
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            sessions: HashMap::new(),
        }
    }

    /// Register an active session token for `user_id`.
    #[must_use]
    pub fn with_session(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.sessions.insert(token.into(), user_id);
        self
    }

    /// Two demo users, `alice` and `bob`, with session tokens
    /// `alice-session` and `bob-session`.
    pub fn demo() -> Self {
        let users: Vec<User> = [
            ("user_alice", "alice", "Alice", "Liddell"),
            ("user_bob", "bob", "Bob", "Builder"),
        ]
        .into_iter()
        .filter_map(|(id, username, first, last)| {
            Some(User {
                id: UserId::new(id).ok()?,
                username: Username::new(username).ok(),
                first_name: Some(first.to_owned()),
                last_name: Some(last.to_owned()),
                profile_image_url: format!("https://images.invalid/{username}.png"),
            })
        })
        .collect();

        let mut provider = Self::new(Vec::new());
        for user in users {
            let token = format!("{}-session", user.username_or_anonymous());
            provider = provider.with_session(token, user.id.clone());
            provider.users.push(user);
        }
        provider
    }

    /// Number of known users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn users_by_ids(
        &self,
        ids: &[UserId],
        limit: usize,
    ) -> Result<Vec<User>, IdentityProviderError> {
        Ok(self
            .users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, IdentityProviderError> {
        Ok(self
            .users
            .iter()
            .find(|user| user.username.as_ref() == Some(username))
            .cloned())
    }

    async fn session_user(&self, token: &str) -> Result<Option<UserId>, IdentityProviderError> {
        Ok(self.sessions.get(token).cloned())
    }
}
