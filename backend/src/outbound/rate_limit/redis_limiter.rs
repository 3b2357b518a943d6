//! Redis-backed sliding-log rate limiter shared by every instance.
//!
//! Each key is a sorted set of request ids scored by the Redis server clock in
//! milliseconds. One Lua script trims expired entries, counts, and records the
//! new request atomically.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::redis::{RedisError, Script};
use bb8_redis::{RedisConnectionManager, bb8};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    RateLimitDecision, RateLimitKey, RateLimitPolicy, RateLimiter, RateLimiterError,
};

const KEY_PREFIX: &str = "murmur:rate-limit:";

/// KEYS[1] = log key; ARGV = permits, window ms, unique member.
/// Returns `{allowed, remaining}`.
const SLIDING_LOG_SCRIPT: &str = r"
local key = KEYS[1]
local permits = tonumber(ARGV[1])
local window_ms = tonumber(ARGV[2])
local clock = redis.call('TIME')
local now_ms = tonumber(clock[1]) * 1000 + math.floor(tonumber(clock[2]) / 1000)
redis.call('ZREMRANGEBYSCORE', key, '-inf', now_ms - window_ms)
local used = redis.call('ZCARD', key)
if used >= permits then
  return {0, 0}
end
redis.call('ZADD', key, now_ms, ARGV[3])
redis.call('PEXPIRE', key, window_ms)
return {1, permits - used - 1}
";

/// Errors raised while building the Redis pool.
#[derive(Debug, thiserror::Error)]
#[error("failed to build redis pool: {0}")]
pub struct RedisPoolError(#[from] RedisError);

/// [`RateLimiter`] backed by a bb8 pool of Redis connections.
pub struct RedisRateLimiter {
    pool: bb8::Pool<RedisConnectionManager>,
    policy: RateLimitPolicy,
    script: Script,
}

impl RedisRateLimiter {
    /// Connect to `redis_url` and build a pool of at most `max_size`
    /// connections.
    ///
    /// # Errors
    ///
    /// Fails when the URL is invalid or the initial connection is refused.
    pub async fn connect(
        redis_url: &str,
        policy: RateLimitPolicy,
        max_size: u32,
        connection_timeout: Duration,
    ) -> Result<Self, RedisPoolError> {
        let manager = RedisConnectionManager::new(redis_url)?;
        let pool = bb8::Pool::builder()
            .max_size(max_size)
            .connection_timeout(connection_timeout)
            .build(manager)
            .await?;
        Ok(Self::new(pool, policy))
    }

    pub fn new(pool: bb8::Pool<RedisConnectionManager>, policy: RateLimitPolicy) -> Self {
        Self {
            pool,
            policy,
            script: Script::new(SLIDING_LOG_SCRIPT),
        }
    }
}

fn redis_key(key: &RateLimitKey) -> String {
    format!("{KEY_PREFIX}{key}")
}

fn window_millis(window: Duration) -> u64 {
    u64::try_from(window.as_millis()).unwrap_or(u64::MAX)
}

fn decision_from_reply((allowed, remaining): (i64, i64)) -> RateLimitDecision {
    RateLimitDecision {
        allowed: allowed == 1,
        remaining: u32::try_from(remaining.max(0)).unwrap_or(u32::MAX),
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check_and_consume(
        &self,
        key: &RateLimitKey,
    ) -> Result<RateLimitDecision, RateLimiterError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            debug!(error = %err, "redis checkout failed");
            RateLimiterError::backend(err.to_string())
        })?;

        let reply: (i64, i64) = self
            .script
            .key(redis_key(key))
            .arg(self.policy.permits())
            .arg(window_millis(self.policy.window()))
            .arg(Uuid::new_v4().to_string())
            .invoke_async(&mut *conn)
            .await
            .map_err(|err| {
                debug!(error = %err, key = %key, "rate limit script failed");
                RateLimiterError::backend(err.to_string())
            })?;

        Ok(decision_from_reply(reply))
    }
}
