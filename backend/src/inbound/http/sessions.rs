//! Session endpoints.
//!
//! ```text
//! POST /api/v1/session {"token":"sess_abc"}
//! DELETE /api/v1/session
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body carrying an identity-provider session token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub token: String,
}

/// Body returned once the cookie session is established.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[schema(value_type = String, example = "user_2abc")]
    pub user_id: UserId,
}

/// Exchange an identity-provider token for a cookie session.
#[utoipa::path(
    post,
    path = "/api/v1/session",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Session established", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank token", body = Error),
        (status = 401, description = "Unknown or inactive token", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["session"],
    operation_id = "createSession",
    security([])
)]
#[post("/session")]
pub async fn create_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SessionRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let user_id = state.login.authenticate(&payload.token).await?;
    session.persist_user(&user_id)?;
    Ok(web::Json(SessionResponse { user_id }))
}

/// Drop the cookie session. Succeeds whether or not one existed.
#[utoipa::path(
    delete,
    path = "/api/v1/session",
    responses((status = 204, description = "Session cleared")),
    tags = ["session"],
    operation_id = "deleteSession",
    security([])
)]
#[delete("/session")]
pub async fn delete_session(session: SessionContext) -> HttpResponse {
    session.forget();
    HttpResponse::NoContent().finish()
}
