//! PostgreSQL-backed `FollowerRepository` implementation using Diesel ORM.
//!
//! Follow is `INSERT .. ON CONFLICT DO NOTHING` against the composite primary
//! key, so repeated follows are idempotent without a read-before-write.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FollowerRepository, FollowerRepositoryError};
use crate::domain::{FollowEdge, UserId};

use super::diesel_error_mapping::{diesel_error, pool_error};
use super::models::NewFollowerRow;
use super::pool::DbPool;
use super::schema::followers;

/// Diesel-backed implementation of the `FollowerRepository` port.
#[derive(Clone)]
pub struct DieselFollowerRepository {
    pool: DbPool,
}

impl DieselFollowerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_user_ids(raw: Vec<String>) -> Result<Vec<UserId>, FollowerRepositoryError> {
    raw.into_iter()
        .map(|id| {
            UserId::new(id)
                .map_err(|err| FollowerRepositoryError::query(format!("invalid user id: {err}")))
        })
        .collect()
}

#[async_trait]
impl FollowerRepository for DieselFollowerRepository {
    async fn insert_edge(&self, edge: &FollowEdge) -> Result<bool, FollowerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = NewFollowerRow {
            follower_id: edge.follower_id.as_str(),
            following_id: edge.following_id.as_str(),
        };

        let inserted = diesel::insert_into(followers::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(inserted > 0)
    }

    async fn delete_edge(&self, edge: &FollowEdge) -> Result<bool, FollowerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let deleted = diesel::delete(
            followers::table.filter(
                followers::follower_id
                    .eq(edge.follower_id.as_str())
                    .and(followers::following_id.eq(edge.following_id.as_str())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        Ok(deleted > 0)
    }

    async fn edge_exists(&self, edge: &FollowEdge) -> Result<bool, FollowerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::select(exists(
            followers::table.filter(
                followers::follower_id
                    .eq(edge.follower_id.as_str())
                    .and(followers::following_id.eq(edge.following_id.as_str())),
            ),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(diesel_error)
    }

    async fn follower_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, FollowerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let raw: Vec<String> = followers::table
            .filter(followers::following_id.eq(user_id.as_str()))
            .order((followers::created_at.desc(), followers::follower_id.asc()))
            .select(followers::follower_id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        to_user_ids(raw)
    }

    async fn following_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserId>, FollowerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let raw: Vec<String> = followers::table
            .filter(followers::follower_id.eq(user_id.as_str()))
            .order((followers::created_at.desc(), followers::following_id.asc()))
            .select(followers::following_id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        to_user_ids(raw)
    }
}
