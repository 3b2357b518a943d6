//! In-memory `FollowerRepository`.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{FollowerRepository, FollowerRepositoryError};
use crate::domain::{FollowEdge, UserId};

/// Edge list kept in insertion order; listings walk it newest first.
#[derive(Default)]
pub struct InMemoryFollowerRepository {
    edges: Mutex<Vec<FollowEdge>>,
}

impl InMemoryFollowerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<FollowEdge>>, FollowerRepositoryError> {
        self.edges
            .lock()
            .map_err(|_| FollowerRepositoryError::query("follower store lock poisoned"))
    }
}

#[async_trait]
impl FollowerRepository for InMemoryFollowerRepository {
    async fn insert_edge(&self, edge: &FollowEdge) -> Result<bool, FollowerRepositoryError> {
        if edge.is_self_edge() {
            return Err(FollowerRepositoryError::query("self follow violates constraint"));
        }
        let mut edges = self.lock()?;
        if edges.contains(edge) {
            return Ok(false);
        }
        edges.push(edge.clone());
        Ok(true)
    }

    async fn delete_edge(&self, edge: &FollowEdge) -> Result<bool, FollowerRepositoryError> {
        let mut edges = self.lock()?;
        let before = edges.len();
        edges.retain(|existing| existing != edge);
        Ok(edges.len() != before)
    }

    async fn edge_exists(&self, edge: &FollowEdge) -> Result<bool, FollowerRepositoryError> {
        Ok(self.lock()?.contains(edge))
    }

    async fn follower_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, FollowerRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .rev()
            .filter(|edge| &edge.following_id == user_id)
            .map(|edge| edge.follower_id.clone())
            .collect())
    }

    async fn following_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserId>, FollowerRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .rev()
            .filter(|edge| &edge.follower_id == user_id)
            .map(|edge| edge.following_id.clone())
            .collect())
    }
}
