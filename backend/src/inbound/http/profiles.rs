//! Profile and follow endpoints.
//!
//! ```text
//! GET /api/v1/profiles/{username}
//! PUT /api/v1/profiles/{username}/follow
//! DELETE /api/v1/profiles/{username}/follow
//! GET /api/v1/users/{userId}/followers
//! GET /api/v1/users/{userId}/following
//! ```

use actix_web::{delete, get, put, web};
use serde_json::json;

use crate::domain::{Error, UserCondensed, UserDetailed, UserId, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::posts::parse_user_id;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn parse_username(raw: String) -> Result<Username, Error> {
    Username::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "username", "code": "invalid_username" }))
    })
}

/// Profile page data for `username`, with relationship flags for the
/// session user when there is one.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Profile", body = UserDetailed),
        (status = 400, description = "Malformed username", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getUserProfile",
    security([])
)]
#[get("/profiles/{username}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserDetailed>> {
    let username = parse_username(path.into_inner())?;
    let viewer = session.user_id()?;
    let profile = state
        .profiles
        .get_user_profile(viewer.as_ref(), &username)
        .await?;
    Ok(web::Json(profile))
}

/// Follow `username`. Repeating the call is a no-op.
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{username}/follow",
    params(("username" = String, Path, description = "Username to follow")),
    responses(
        (status = 200, description = "Now following", body = UserCondensed),
        (status = 400, description = "Cannot follow yourself", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "followUser"
)]
#[put("/profiles/{username}/follow")]
pub async fn follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserCondensed>> {
    let follower = session.require_user_id()?;
    let target = parse_username(path.into_inner())?;
    Ok(web::Json(state.follows.follow_user(&follower, &target).await?))
}

/// Stop following `username`. Succeeds when no edge existed.
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{username}/follow",
    params(("username" = String, Path, description = "Username to unfollow")),
    responses(
        (status = 200, description = "No longer following", body = UserCondensed),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "unfollowUser"
)]
#[delete("/profiles/{username}/follow")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserCondensed>> {
    let follower = session.require_user_id()?;
    let target = parse_username(path.into_inner())?;
    Ok(web::Json(
        state.follows.unfollow_user(&follower, &target).await?,
    ))
}

/// Ids of the users following `userId`, most recent first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/followers",
    params(("userId" = String, Path, description = "Identity provider user id")),
    responses(
        (status = 200, description = "Follower ids", body = [String]),
        (status = 400, description = "Malformed user id", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "listFollowerIds",
    security([])
)]
#[get("/users/{user_id}/followers")]
pub async fn list_follower_ids(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserId>>> {
    let user_id = parse_user_id(path.into_inner())?;
    Ok(web::Json(state.graph.follower_ids(&user_id).await?))
}

/// Ids of the users `userId` follows, most recent first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/following",
    params(("userId" = String, Path, description = "Identity provider user id")),
    responses(
        (status = 200, description = "Followed user ids", body = [String]),
        (status = 400, description = "Malformed user id", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "listFollowingIds",
    security([])
)]
#[get("/users/{user_id}/following")]
pub async fn list_following_ids(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserId>>> {
    let user_id = parse_user_id(path.into_inner())?;
    Ok(web::Json(state.graph.following_ids(&user_id).await?))
}
