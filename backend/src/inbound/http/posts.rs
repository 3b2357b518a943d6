//! Post and feed endpoints.
//!
//! ```text
//! GET /api/v1/posts
//! POST /api/v1/posts {"content":"hello"}
//! GET /api/v1/posts/{id}
//! GET /api/v1/users/{userId}/posts
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Post, PostId, PostWithAuthor, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/posts`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[schema(example = "hello world")]
    pub content: String,
}

fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    Uuid::parse_str(raw).map(PostId::from_uuid).map_err(|_| {
        Error::invalid_request("post id must be a UUID")
            .with_details(json!({ "field": "id", "code": "invalid_post_id" }))
    })
}

pub(crate) fn parse_user_id(raw: String) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "userId", "code": "invalid_user_id" }))
    })
}

/// Most recent posts across all authors, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses(
        (status = 200, description = "Recent posts", body = [PostWithAuthor]),
        (status = 500, description = "Author could not be resolved", body = Error),
        (status = 503, description = "Dependency unavailable", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listRecentPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_recent_posts(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PostWithAuthor>>> {
    Ok(web::Json(state.feed.list_recent_posts().await?))
}

/// Publish a post as the session user.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Content empty or too long", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 429, description = "Too many posts in the current window", body = Error),
        (status = 503, description = "Dependency unavailable", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let CreatePostRequest { content } = payload.into_inner();
    let post = state.posts.create_post(&actor, content).await?;
    Ok(HttpResponse::Created().json(post))
}

/// A single post with its author.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id (UUID)")),
    responses(
        (status = 200, description = "Post", body = PostWithAuthor),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security([])
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostWithAuthor>> {
    let id = parse_post_id(&path)?;
    Ok(web::Json(state.feed.get_post(&id).await?))
}

/// Every post by one author, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/posts",
    params(("userId" = String, Path, description = "Identity provider user id")),
    responses(
        (status = 200, description = "Posts by the user", body = [PostWithAuthor]),
        (status = 400, description = "Malformed user id", body = Error),
        (status = 500, description = "Author could not be resolved", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPostsByUser",
    security([])
)]
#[get("/users/{user_id}/posts")]
pub async fn list_posts_by_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PostWithAuthor>>> {
    let user_id = parse_user_id(path.into_inner())?;
    Ok(web::Json(state.feed.list_posts_by_user(&user_id).await?))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
