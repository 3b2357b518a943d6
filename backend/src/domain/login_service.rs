//! Session token login backed by the identity provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::enrichment::map_identity_error;
use crate::domain::ports::{IdentityProvider, LoginService};
use crate::domain::{Error, UserId};

/// [`LoginService`] that asks the identity provider who owns a token.
pub struct IdentityLoginService<I: ?Sized> {
    provider: Arc<I>,
}

impl<I: ?Sized> IdentityLoginService<I> {
    pub fn new(provider: Arc<I>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<I> LoginService for IdentityLoginService<I>
where
    I: IdentityProvider + ?Sized,
{
    async fn authenticate(&self, token: &str) -> Result<UserId, Error> {
        if token.trim().is_empty() {
            return Err(Error::invalid_request("session token must not be empty"));
        }
        match self
            .provider
            .session_user(token)
            .await
            .map_err(map_identity_error)?
        {
            Some(user_id) => Ok(user_id),
            None => {
                info!("rejected unknown session token");
                Err(Error::unauthorized("invalid session token"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{IdentityProviderError, MockIdentityProvider};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn known_token_yields_its_owner() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_session_user()
            .withf(|token| token == "alice-session")
            .return_once(|_| Ok(Some(UserId::new("user_alice").expect("fixture id"))));

        let user = IdentityLoginService::new(Arc::new(provider))
            .authenticate("alice-session")
            .await
            .expect("login");

        assert_eq!(user.as_str(), "user_alice");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_token_is_unauthorised() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_session_user().return_once(|_| Ok(None));

        let error = IdentityLoginService::new(Arc::new(provider))
            .authenticate("forged")
            .await
            .expect_err("unknown token");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn blank_token_never_reaches_the_provider(#[case] token: &str) {
        let mut provider = MockIdentityProvider::new();
        provider.expect_session_user().times(0);

        let error = IdentityLoginService::new(Arc::new(provider))
            .authenticate(token)
            .await
            .expect_err("blank token");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn provider_outage_is_unavailable() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_session_user()
            .return_once(|_| Err(IdentityProviderError::unavailable("timeout")));

        let error = IdentityLoginService::new(Arc::new(provider))
            .authenticate("alice-session")
            .await
            .expect_err("outage");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
