//! Follower graph primitives and the detailed profile projection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{UserCondensed, UserId};

/// Number of users included in follower and following previews.
pub const FOLLOW_PREVIEW_LENGTH: usize = 5;

/// Directed edge: `follower_id` follows `following_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub following_id: UserId,
}

impl FollowEdge {
    /// Build the edge `follower -> following`.
    pub fn new(follower_id: UserId, following_id: UserId) -> Self {
        Self {
            follower_id,
            following_id,
        }
    }

    /// Whether the edge points back at its own source.
    pub fn is_self_edge(&self) -> bool {
        self.follower_id == self.following_id
    }
}

/// Relationship state between a viewer and a target user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relationship {
    /// The viewer follows the target.
    pub is_following: bool,
    /// The target follows the viewer.
    pub is_followed_by: bool,
}

/// Profile projection with social graph data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailed {
    #[serde(flatten)]
    pub user: UserCondensed,
    pub following_preview: Vec<UserCondensed>,
    pub followers_preview: Vec<UserCondensed>,
    pub is_following: bool,
    pub is_followed_by: bool,
    pub num_followers: u64,
    pub num_following: u64,
}
