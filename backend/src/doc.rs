//! OpenAPI document for the JSON API.
//!
//! Served through Swagger UI at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Post, PostWithAuthor, UserCondensed, UserDetailed};
use crate::inbound::http::posts::CreatePostRequest;
use crate::inbound::http::sessions::{SessionRequest, SessionResponse};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/session.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Murmur API",
        description = "Short posts, a recent-posts feed, and a follower graph."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::sessions::create_session,
        crate::inbound::http::sessions::delete_session,
        crate::inbound::http::posts::list_recent_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::list_posts_by_user,
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::profiles::follow,
        crate::inbound::http::profiles::unfollow,
        crate::inbound::http::profiles::list_follower_ids,
        crate::inbound::http::profiles::list_following_ids,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Post,
        PostWithAuthor,
        UserCondensed,
        UserDetailed,
        CreatePostRequest,
        SessionRequest,
        SessionResponse
    )),
    tags(
        (name = "session", description = "Cookie session login and logout"),
        (name = "posts", description = "Posting and the feed"),
        (name = "profiles", description = "Profiles and the follower graph"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
