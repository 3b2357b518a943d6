//! Process-local sliding-log rate limiter.
//!
//! Each key keeps the timestamps of its accepted requests inside the current
//! window. State is lost on restart and not shared between instances, so this
//! adapter is for tests and single-process development.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    RateLimitDecision, RateLimitKey, RateLimitPolicy, RateLimiter, RateLimiterError,
};

/// In-memory [`RateLimiter`] driven by an injected clock.
pub struct InMemoryRateLimiter {
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
    log: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl InMemoryRateLimiter {
    pub fn new(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            log: Mutex::new(HashMap::new()),
        }
    }

    fn window(&self) -> TimeDelta {
        TimeDelta::from_std(self.policy.window()).unwrap_or(TimeDelta::MAX)
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check_and_consume(
        &self,
        key: &RateLimitKey,
    ) -> Result<RateLimitDecision, RateLimiterError> {
        let now = self.clock.utc();
        let cutoff = now.checked_sub_signed(self.window()).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let permits = self.policy.permits() as usize;

        let mut log = self
            .log
            .lock()
            .map_err(|_| RateLimiterError::backend("rate limiter state poisoned"))?;
        // Keys whose whole log has aged out are dropped so idle actors do not
        // accumulate.
        log.retain(|_, entries| {
            while entries.front().is_some_and(|at| *at <= cutoff) {
                entries.pop_front();
            }
            !entries.is_empty()
        });

        let used = log.get(key.as_str()).map_or(0, VecDeque::len);
        if used >= permits {
            return Ok(RateLimitDecision {
                allowed: false,
                remaining: 0,
            });
        }
        log.entry(key.as_str().to_owned()).or_default().push_back(now);
        let remaining = u32::try_from(permits - used - 1).unwrap_or(u32::MAX);
        Ok(RateLimitDecision {
            allowed: true,
            remaining,
        })
    }
}

#[cfg(test)]
impl InMemoryRateLimiter {
    fn tracked_keys(&self) -> usize {
        self.log.lock().map_or(0, |log| log.len())
    }
}
