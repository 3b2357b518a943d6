//! Rate limiter outbound adapters.
//!
//! - **redis**: sliding log shared across instances (production)
//! - **memory**: process-local sliding log on the injected clock

mod memory;
mod redis_limiter;

pub use memory::InMemoryRateLimiter;
pub use redis_limiter::{RedisPoolError, RedisRateLimiter};
