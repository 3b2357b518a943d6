//! HTTP inbound adapter exposing the JSON API under `/api/v1`.

use actix_web::web;

pub mod error;
pub mod health;
pub mod posts;
pub mod profiles;
pub mod session;
pub mod session_config;
pub mod sessions;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

/// Path prefix shared by every API endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Register every API handler under [`API_PREFIX`].
///
/// Callers supply `web::Data<HttpState>` and the session middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use murmur::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .service(sessions::create_session)
            .service(sessions::delete_session)
            .service(posts::list_recent_posts)
            .service(posts::create_post)
            .service(posts::get_post)
            .service(posts::list_posts_by_user)
            .service(profiles::get_profile)
            .service(profiles::follow)
            .service(profiles::unfollow)
            .service(profiles::list_follower_ids)
            .service(profiles::list_following_ids),
    );
}
