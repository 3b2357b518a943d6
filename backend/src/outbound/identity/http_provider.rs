//! Reqwest-backed identity provider adapter.
//!
//! Speaks a Clerk-style REST API: user listing filtered by repeated
//! `user_id`/`username` query parameters and session lookup by token, all
//! authorised with a bearer secret key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{SessionDto, UserDto};
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{User, UserId, Username};

const DEFAULT_USER_AGENT: &str = "murmur-backend/0.1";

/// Identity provider adapter performing HTTP requests against one base URL.
pub struct HttpIdentityProvider {
    client: Client,
    base: Url,
    secret_key: Option<String>,
}

impl HttpIdentityProvider {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        secret_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base,
            secret_key,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, IdentityProviderError> {
        build_endpoint(&self.base, segments)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, "application/json");
        match &self.secret_key {
            Some(secret) => request.bearer_auth(secret),
            None => request,
        }
    }

    async fn list_users(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Vec<User>, IdentityProviderError> {
        let url = self.endpoint(&["v1", "users"])?;
        let response = self
            .authorised(self.client.get(url).query(query))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let users: Vec<UserDto> = decode(body.as_ref())?;
        users
            .into_iter()
            .map(|dto| dto.into_domain().map_err(IdentityProviderError::decode))
            .collect()
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn users_by_ids(
        &self,
        ids: &[UserId],
        limit: usize,
    ) -> Result<Vec<User>, IdentityProviderError> {
        if ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let limit = limit.to_string();
        let mut query: Vec<(&str, &str)> = ids.iter().map(|id| ("user_id", id.as_str())).collect();
        query.push(("limit", limit.as_str()));
        self.list_users(&query).await
    }

    async fn user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, IdentityProviderError> {
        let users = self
            .list_users(&[("username", username.as_str()), ("limit", "1")])
            .await?;
        Ok(users.into_iter().next())
    }

    async fn session_user(&self, token: &str) -> Result<Option<UserId>, IdentityProviderError> {
        let url = self.endpoint(&["v1", "sessions", token])?;
        let response = self
            .authorised(self.client.get(url))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let session: SessionDto = decode(body.as_ref())?;
        session
            .into_active_user()
            .map_err(IdentityProviderError::decode)
    }
}

/// Append `segments` to `base`, percent-encoding each one.
fn build_endpoint(base: &Url, segments: &[&str]) -> Result<Url, IdentityProviderError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| IdentityProviderError::rejected(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, IdentityProviderError> {
    serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid identity provider JSON: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    debug!(timeout = error.is_timeout(), error = %error, "identity provider request failed");
    IdentityProviderError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    debug!(status = status.as_u16(), "identity provider returned an error status");

    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => {
            IdentityProviderError::unavailable(message)
        }
        _ if status.is_client_error() => IdentityProviderError::rejected(message),
        _ => IdentityProviderError::unavailable(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
