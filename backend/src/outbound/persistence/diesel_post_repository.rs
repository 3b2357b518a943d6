//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{Post, PostContent, PostId, UserId};

use super::diesel_error_mapping::{diesel_error, pool_error};
use super::models::{NewPostRow, PostRow};
use super::pool::DbPool;
use super::schema::posts;

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a stored row back into a domain post.
///
/// Rows are written through the domain constructors, so a failure here means
/// the table was modified out of band.
fn row_to_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    let author_id = UserId::new(row.author_id).map_err(|err| {
        warn!(post_id = %row.id, error = %err, "stored post has an invalid author id");
        PostRepositoryError::query(format!("invalid author id: {err}"))
    })?;
    let content = PostContent::new(row.content).map_err(|err| {
        warn!(post_id = %row.id, error = %err, "stored post has invalid content");
        PostRepositoryError::query(format!("invalid content: {err}"))
    })?;
    Ok(Post {
        id: PostId::from_uuid(row.id),
        author_id,
        content,
        created_at: row.created_at,
    })
}

fn rows_to_posts(rows: Vec<PostRow>) -> Result<Vec<Post>, PostRepositoryError> {
    rows.into_iter().map(row_to_post).collect()
}

/// Clamp a `usize` limit into Diesel's `i64` range.
fn limit_for_db(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = NewPostRow {
            id: *post.id.as_uuid(),
            author_id: post.author_id.as_str(),
            content: post.content.as_str(),
            created_at: post.created_at,
        };

        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<PostRow> = posts::table
            .select(PostRow::as_select())
            .order((posts::created_at.desc(), posts::id.desc()))
            .limit(limit_for_db(limit))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows_to_posts(rows)
    }

    async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<PostRow> = posts::table
            .filter(posts::author_id.eq(author_id.as_str()))
            .select(PostRow::as_select())
            .order((posts::created_at.desc(), posts::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows_to_posts(rows)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<PostRow> = posts::table
            .filter(posts::id.eq(id.as_uuid()))
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_post).transpose()
    }
}
