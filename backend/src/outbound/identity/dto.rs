//! DTOs for decoding identity provider JSON responses.

use serde::Deserialize;
use tracing::warn;

use crate::domain::{User, UserId, Username};

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) username: Option<String>,
    #[serde(default)]
    pub(super) first_name: Option<String>,
    #[serde(default)]
    pub(super) last_name: Option<String>,
    #[serde(default, alias = "profile_image_url")]
    pub(super) image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) user_id: String,
    #[serde(default)]
    pub(super) status: Option<String>,
}

impl UserDto {
    /// Map into a domain user.
    ///
    /// An invalid id fails the record. A username the provider allows but the
    /// domain does not is dropped, so the user renders as anonymous.
    pub(super) fn into_domain(self) -> Result<User, String> {
        let id = UserId::new(self.id.as_str())
            .map_err(|err| format!("user {:?} has an invalid id: {err}", self.id))?;
        let username = self.username.and_then(|raw| match Username::new(raw.as_str()) {
            Ok(username) => Some(username),
            Err(err) => {
                warn!(user_id = %id, error = %err, "ignoring unsupported username");
                None
            }
        });
        Ok(User {
            id,
            username,
            first_name: self.first_name,
            last_name: self.last_name,
            profile_image_url: self.image_url.unwrap_or_default(),
        })
    }
}

impl SessionDto {
    /// Owner of the session, when it is still active.
    pub(super) fn into_active_user(self) -> Result<Option<UserId>, String> {
        let active = self
            .status
            .as_deref()
            .is_none_or(|status| status.eq_ignore_ascii_case("active"));
        if !active {
            return Ok(None);
        }
        UserId::new(self.user_id)
            .map(Some)
            .map_err(|err| format!("session has an invalid user id: {err}"))
    }
}
