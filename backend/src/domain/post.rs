//! Posts and their validated content.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{UserCondensed, UserId};

/// Minimum post length in characters.
pub const POST_CONTENT_MIN: usize = 1;
/// Maximum post length in characters.
pub const POST_CONTENT_MAX: usize = 280;

/// Validation errors for post content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    #[error("post content must not be empty")]
    EmptyContent,
    #[error("post content must be at most {max} characters, got {length}")]
    ContentTooLong { max: usize, length: usize },
}

/// Unique post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Post body, 1 to 280 characters.
///
/// Length counts Unicode scalar values. Content is stored exactly as
/// submitted; surrounding whitespace is kept and counts towards the limit.
///
/// # Examples
/// ```
/// use murmur::domain::PostContent;
///
/// assert!(PostContent::new("hello world").is_ok());
/// assert!(PostContent::new("").is_err());
/// assert!(PostContent::new("x".repeat(281)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostContent(String);

impl PostContent {
    /// Validate and construct post content.
    pub fn new(content: impl Into<String>) -> Result<Self, PostValidationError> {
        let content = content.into();
        let length = content.chars().count();
        if length < POST_CONTENT_MIN {
            return Err(PostValidationError::EmptyContent);
        }
        if length > POST_CONTENT_MAX {
            return Err(PostValidationError::ContentTooLong {
                max: POST_CONTENT_MAX,
                length,
            });
        }
        Ok(Self(content))
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PostContent> for String {
    fn from(value: PostContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostContent {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A persisted post. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: PostId,
    #[schema(value_type = String, example = "user_alice")]
    pub author_id: UserId,
    #[schema(value_type = String, example = "hello world")]
    pub content: PostContent,
    #[schema(value_type = String, example = "2026-01-01T12:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Build a brand-new post with a fresh identifier.
    pub fn new(author_id: UserId, content: PostContent, created_at: DateTime<Utc>) -> Self {
        Self {
            id: PostId::random(),
            author_id,
            content,
            created_at,
        }
    }
}

/// A post paired with its author's display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: UserCondensed,
}
