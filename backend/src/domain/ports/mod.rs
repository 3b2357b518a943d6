//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`PostRepository`, `FollowerRepository`, `IdentityProvider`,
//! `RateLimiter`) are implemented by outbound adapters. Driving ports
//! (`FeedQuery`, `PostCommand`, `ProfileQuery`, `SocialGraphQuery`,
//! `SocialGraphCommand`, `LoginService`) are implemented by domain services
//! and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod feed_query;
mod follower_repository;
mod identity_provider;
mod login_service;
mod post_command;
mod post_repository;
mod profile_query;
mod rate_limiter;
mod social_graph_command;
mod social_graph_query;

pub use feed_query::FeedQuery;
#[cfg(test)]
pub use follower_repository::MockFollowerRepository;
pub use follower_repository::{FollowerRepository, FollowerRepositoryError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
pub use login_service::LoginService;
pub use post_command::PostCommand;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
pub use profile_query::ProfileQuery;
#[cfg(test)]
pub use rate_limiter::MockRateLimiter;
pub use rate_limiter::{
    DEFAULT_POST_PERMITS, DEFAULT_POST_WINDOW, RateLimitDecision, RateLimitKey, RateLimitPolicy,
    RateLimiter, RateLimiterError,
};
pub use social_graph_command::SocialGraphCommand;
pub use social_graph_query::SocialGraphQuery;
