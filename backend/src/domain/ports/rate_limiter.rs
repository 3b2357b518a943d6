//! Port for the shared sliding-window rate limiter.
//!
//! Limiter state lives outside the process so every instance of the service
//! observes the same counters. Adapters are constructed with a
//! [`RateLimitPolicy`]; callers only name the key being consumed.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

/// Default number of posts permitted per window.
pub const DEFAULT_POST_PERMITS: u32 = 5;
/// Default window length.
pub const DEFAULT_POST_WINDOW: Duration = Duration::from_secs(60);

define_port_error! {
    /// Errors raised by rate limiter adapters.
    pub enum RateLimiterError {
        /// The limiter backend could not be reached or failed to answer.
        Backend { message: String } =>
            "rate limiter backend failed: {message}",
    }
}

/// Identifies the counter a request consumes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    /// Counter guarding post creation for one actor.
    pub fn post_create(actor: &UserId) -> Self {
        Self(format!("post-create:{actor}"))
    }

    /// Raw key value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single `check_and_consume` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request may proceed. Rejected requests consume nothing.
    pub allowed: bool,
    /// Permits left in the current window after this call.
    pub remaining: u32,
}

/// Sliding-window parameters: at most `permits` actions per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    permits: u32,
    window: Duration,
}

impl RateLimitPolicy {
    /// Build a policy. Zero permits or a zero-length window are raised to
    /// one permit and one millisecond respectively.
    pub fn new(permits: u32, window: Duration) -> Self {
        Self {
            permits: permits.max(1),
            window: window.max(Duration::from_millis(1)),
        }
    }

    /// Permits per window.
    pub fn permits(&self) -> u32 {
        self.permits
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POST_PERMITS, DEFAULT_POST_WINDOW)
    }
}

/// Sliding-window limiter consulted before rate-limited writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Atomically check the counter for `key` and consume one permit if the
    /// window has room.
    async fn check_and_consume(
        &self,
        key: &RateLimitKey,
    ) -> Result<RateLimitDecision, RateLimiterError>;
}
