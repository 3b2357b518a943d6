//! Follower graph reads, follow/unfollow, and profile assembly.
//!
//! Relationship flags are always computed from a single edge lookup between
//! two explicit parties; nothing is inferred from a user's own follower list.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::enrichment::UserDirectory;
use crate::domain::ports::{
    FollowerRepository, FollowerRepositoryError, IdentityProvider, ProfileQuery,
    SocialGraphCommand, SocialGraphQuery,
};
use crate::domain::{
    Error, FOLLOW_PREVIEW_LENGTH, FollowEdge, Relationship, UserCondensed, UserDetailed, UserId,
    Username,
};

fn map_repository_error(error: FollowerRepositoryError) -> Error {
    match error {
        FollowerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("follower repository unavailable: {message}"))
        }
        FollowerRepositoryError::Query { message } => {
            Error::internal(format!("follower repository error: {message}"))
        }
    }
}

/// Social graph service implementing [`ProfileQuery`], [`SocialGraphQuery`]
/// and [`SocialGraphCommand`].
pub struct SocialGraphService<F: ?Sized, I: ?Sized> {
    followers: Arc<F>,
    directory: UserDirectory<I>,
}

impl<F, I> SocialGraphService<F, I>
where
    F: FollowerRepository + ?Sized,
    I: IdentityProvider + ?Sized,
{
    pub fn new(followers: Arc<F>, directory: UserDirectory<I>) -> Self {
        Self {
            followers,
            directory,
        }
    }

    async fn edge_exists(&self, follower: &UserId, following: &UserId) -> Result<bool, Error> {
        self.followers
            .edge_exists(&FollowEdge::new(follower.clone(), following.clone()))
            .await
            .map_err(map_repository_error)
    }

    async fn relationship(&self, viewer: &UserId, target: &UserId) -> Result<Relationship, Error> {
        Ok(Relationship {
            is_following: self.edge_exists(viewer, target).await?,
            is_followed_by: self.edge_exists(target, viewer).await?,
        })
    }
}

#[async_trait]
impl<F, I> SocialGraphQuery for SocialGraphService<F, I>
where
    F: FollowerRepository + ?Sized,
    I: IdentityProvider + ?Sized,
{
    async fn follower_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, Error> {
        self.followers
            .follower_ids(user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn following_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, Error> {
        self.followers
            .following_ids(user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn is_following(&self, viewer: &UserId, target: &UserId) -> Result<bool, Error> {
        self.edge_exists(viewer, target).await
    }
}

#[async_trait]
impl<F, I> ProfileQuery for SocialGraphService<F, I>
where
    F: FollowerRepository + ?Sized,
    I: IdentityProvider + ?Sized,
{
    async fn get_user_profile(
        &self,
        viewer: Option<&UserId>,
        username: &Username,
    ) -> Result<UserDetailed, Error> {
        let user = self.directory.find_by_username(username).await?;
        let follower_ids = self.follower_ids(&user.id).await?;
        let following_ids = self.following_ids(&user.id).await?;

        let followers_preview = self
            .directory
            .preview(&follower_ids, FOLLOW_PREVIEW_LENGTH)
            .await?;
        let following_preview = self
            .directory
            .preview(&following_ids, FOLLOW_PREVIEW_LENGTH)
            .await?;

        let relationship = match viewer {
            Some(viewer) => self.relationship(viewer, &user.id).await?,
            None => Relationship::default(),
        };

        Ok(UserDetailed {
            user: user.condensed(),
            following_preview,
            followers_preview,
            is_following: relationship.is_following,
            is_followed_by: relationship.is_followed_by,
            num_followers: follower_ids.len() as u64,
            num_following: following_ids.len() as u64,
        })
    }
}

#[async_trait]
impl<F, I> SocialGraphCommand for SocialGraphService<F, I>
where
    F: FollowerRepository + ?Sized,
    I: IdentityProvider + ?Sized,
{
    async fn follow_user(
        &self,
        follower: &UserId,
        target: &Username,
    ) -> Result<UserCondensed, Error> {
        let target = self.directory.find_by_username(target).await?;
        let edge = FollowEdge::new(follower.clone(), target.id.clone());
        if edge.is_self_edge() {
            return Err(Error::invalid_request("cannot follow yourself"));
        }
        let created = self
            .followers
            .insert_edge(&edge)
            .await
            .map_err(map_repository_error)?;
        debug!(follower = %follower, following = %target.id, created, "follow edge upserted");
        Ok(target.condensed())
    }

    async fn unfollow_user(
        &self,
        follower: &UserId,
        target: &Username,
    ) -> Result<UserCondensed, Error> {
        let target = self.directory.find_by_username(target).await?;
        let edge = FollowEdge::new(follower.clone(), target.id.clone());
        let removed = self
            .followers
            .delete_edge(&edge)
            .await
            .map_err(map_repository_error)?;
        debug!(follower = %follower, following = %target.id, removed, "follow edge removed");
        Ok(target.condensed())
    }
}

#[cfg(test)]
#[path = "social_graph_service_tests.rs"]
mod tests;
