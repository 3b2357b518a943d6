//! Domain primitives, ports, and services.
//!
//! Purpose: hold the posting, feed, and follower-graph rules independent of
//! HTTP, Postgres, Redis, or the identity provider's wire format. Types keep
//! their invariants in constructors and document serde contracts inline.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - User, UserId, Username, UserCondensed: identity records and projections.
//! - Post, PostId, PostContent, PostWithAuthor: posts and enriched posts.
//! - FollowEdge, UserDetailed: follower graph edges and profile projection.
//! - FeedService, SocialGraphService, IdentityLoginService: use cases behind
//!   the driving ports in [`ports`].

pub mod enrichment;
pub mod error;
pub mod feed_service;
pub mod login_service;
pub mod ports;
pub mod post;
pub mod social;
pub mod social_graph_service;
pub mod trace_id;
pub mod user;

pub use self::enrichment::{DEFAULT_IDENTITY_BATCH_SIZE, UserDirectory};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::feed_service::{DEFAULT_RECENT_POSTS_LIMIT, FeedService};
pub use self::login_service::IdentityLoginService;
pub use self::post::{
    POST_CONTENT_MAX, POST_CONTENT_MIN, Post, PostContent, PostId, PostValidationError,
    PostWithAuthor,
};
pub use self::social::{FOLLOW_PREVIEW_LENGTH, FollowEdge, Relationship, UserDetailed};
pub use self::social_graph_service::SocialGraphService;
pub use self::trace_id::TraceId;
pub use self::user::{
    ANONYMOUS_USERNAME, User, UserCondensed, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use murmur::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("post not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
