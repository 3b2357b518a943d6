//! Test utilities shared by unit tests in `src/` and integration tests in
//! `tests/`. Only compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{FixtureIdentityProvider, RateLimitPolicy};
use crate::domain::{
    DEFAULT_IDENTITY_BATCH_SIZE, FeedService, IdentityLoginService, SocialGraphService,
    UserDirectory,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{InMemoryFollowerRepository, InMemoryPostRepository};
use crate::outbound::rate_limit::InMemoryRateLimiter;

/// Clock whose time only moves when a test says so.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Fixed starting instant used across the suites.
    pub fn at_epoch() -> Self {
        let start = match Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).single() {
            Some(start) => start,
            None => panic!("fixed test instant is valid"),
        };
        Self::new(start)
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// HTTP state over in-memory stores, the demo identity provider, and the
/// default posting policy, all driven by `clock`.
pub fn in_memory_http_state(clock: Arc<MutableClock>) -> HttpState {
    let provider = Arc::new(FixtureIdentityProvider::demo());
    let directory = UserDirectory::new(Arc::clone(&provider), DEFAULT_IDENTITY_BATCH_SIZE);
    let limiter = Arc::new(InMemoryRateLimiter::new(
        RateLimitPolicy::default(),
        clock.clone(),
    ));
    let feed = Arc::new(FeedService::new(
        Arc::new(InMemoryPostRepository::new()),
        directory.clone(),
        limiter,
        clock,
    ));
    let graph = Arc::new(SocialGraphService::new(
        Arc::new(InMemoryFollowerRepository::new()),
        directory,
    ));

    HttpState::new(HttpStatePorts {
        login: Arc::new(IdentityLoginService::new(provider)),
        feed: feed.clone(),
        posts: feed,
        profiles: graph.clone(),
        graph: graph.clone(),
        follows: graph,
    })
}
