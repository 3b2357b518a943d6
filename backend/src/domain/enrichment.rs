//! Author enrichment and user previews backed by the identity provider.
//!
//! Provider lookups are capped at `batch_size` ids per call, so every call
//! site goes through [`UserDirectory`], which de-duplicates ids and splits
//! them into chunks of at most that size.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::error;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Error, Post, PostWithAuthor, User, UserCondensed, UserId, Username};

/// Default number of ids per identity provider lookup.
pub const DEFAULT_IDENTITY_BATCH_SIZE: usize = 100;

pub(crate) fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Rejected { message } => {
            Error::internal(format!("identity provider rejected lookup: {message}"))
        }
        IdentityProviderError::Decode { message } => {
            Error::internal(format!("identity provider response invalid: {message}"))
        }
    }
}

/// Batched, chunking view over an [`IdentityProvider`].
pub struct UserDirectory<I: ?Sized> {
    provider: Arc<I>,
    batch_size: usize,
}

impl<I: ?Sized> Clone for UserDirectory<I> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            batch_size: self.batch_size,
        }
    }
}

impl<I> UserDirectory<I>
where
    I: IdentityProvider + ?Sized,
{
    /// Wrap `provider`, issuing at most `batch_size` ids per lookup.
    pub fn new(provider: Arc<I>, batch_size: usize) -> Self {
        Self {
            provider,
            batch_size: batch_size.max(1),
        }
    }

    /// Ids per provider call.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Resolve a username or fail with `not_found`.
    pub async fn find_by_username(&self, username: &Username) -> Result<User, Error> {
        self.provider
            .user_by_username(username)
            .await
            .map_err(map_identity_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Look up every distinct id in `ids`, chunked by `batch_size`.
    ///
    /// Users the provider does not know are simply absent from the map.
    pub async fn resolve(&self, ids: &[UserId]) -> Result<HashMap<UserId, User>, Error> {
        let distinct = distinct_in_order(ids);
        let mut found = HashMap::with_capacity(distinct.len());
        for chunk in distinct.chunks(self.batch_size) {
            let users = self
                .provider
                .users_by_ids(chunk, chunk.len())
                .await
                .map_err(map_identity_error)?;
            found.extend(users.into_iter().map(|user| (user.id.clone(), user)));
        }
        Ok(found)
    }

    /// Pair every post with its author, preserving order.
    ///
    /// All or nothing: a single unresolvable author fails the whole batch
    /// with an internal error.
    pub async fn enrich(&self, posts: Vec<Post>) -> Result<Vec<PostWithAuthor>, Error> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let author_ids: Vec<UserId> = posts.iter().map(|post| post.author_id.clone()).collect();
        let authors = self.resolve(&author_ids).await?;

        posts
            .into_iter()
            .map(|post| match authors.get(&post.author_id) {
                Some(author) => Ok(PostWithAuthor {
                    author: author.condensed(),
                    post,
                }),
                None => {
                    error!(
                        post_id = %post.id,
                        author_id = %post.author_id,
                        "post author missing from identity provider"
                    );
                    Err(Error::internal("author not found"))
                }
            })
            .collect()
    }

    /// Condensed view of up to `cap` users taken from `ids` in order.
    ///
    /// Best effort: ids the provider does not know are skipped, and later
    /// ids fill the gap, one chunk at a time.
    pub async fn preview(&self, ids: &[UserId], cap: usize) -> Result<Vec<UserCondensed>, Error> {
        let mut preview = Vec::with_capacity(cap.min(ids.len()));
        if cap == 0 {
            return Ok(preview);
        }
        let distinct = distinct_in_order(ids);
        for chunk in distinct.chunks(self.batch_size.min(cap)) {
            let users = self
                .provider
                .users_by_ids(chunk, chunk.len())
                .await
                .map_err(map_identity_error)?;
            let mut by_id: HashMap<UserId, User> =
                users.into_iter().map(|user| (user.id.clone(), user)).collect();
            for id in chunk {
                if preview.len() == cap {
                    return Ok(preview);
                }
                if let Some(user) = by_id.remove(id) {
                    preview.push(user.condensed());
                }
            }
            if preview.len() == cap {
                break;
            }
        }
        Ok(preview)
    }
}

fn distinct_in_order(ids: &[UserId]) -> Vec<UserId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "enrichment_tests.rs"]
mod tests;
