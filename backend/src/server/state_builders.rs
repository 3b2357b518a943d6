//! Adapter selection and service wiring for the HTTP state.
//!
//! Each driven port uses its production adapter when configured and falls
//! back to an in-memory or fixture adapter otherwise, logging a warning.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use murmur::config::AppSettings;
use murmur::domain::ports::{
    FixtureIdentityProvider, FollowerRepository, IdentityProvider, PostRepository, RateLimiter,
};
use murmur::domain::{FeedService, IdentityLoginService, SocialGraphService, UserDirectory};
use murmur::inbound::http::state::{HttpState, HttpStatePorts};
use murmur::outbound::identity::HttpIdentityProvider;
use murmur::outbound::memory::{InMemoryFollowerRepository, InMemoryPostRepository};
use murmur::outbound::persistence::{
    DbPool, DieselFollowerRepository, DieselPostRepository, PoolConfig, run_pending_migrations,
};
use murmur::outbound::rate_limit::{InMemoryRateLimiter, RedisRateLimiter};

const REDIS_POOL_SIZE: u32 = 8;
const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

struct Repositories {
    posts: Arc<dyn PostRepository>,
    followers: Arc<dyn FollowerRepository>,
}

async fn build_repositories(settings: &AppSettings) -> std::io::Result<Repositories> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("MURMUR_DATABASE_URL not set; using in-memory repositories (dev only)");
        return Ok(Repositories {
            posts: Arc::new(InMemoryPostRepository::new()),
            followers: Arc::new(InMemoryFollowerRepository::new()),
        });
    };

    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
    } else {
        info!("skipping database migrations");
    }

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.database_pool_size()),
    )
    .await
    .map_err(std::io::Error::other)?;

    Ok(Repositories {
        posts: Arc::new(DieselPostRepository::new(pool.clone())),
        followers: Arc::new(DieselFollowerRepository::new(pool)),
    })
}

fn build_identity_provider(settings: &AppSettings) -> std::io::Result<Arc<dyn IdentityProvider>> {
    let Some(base) = settings.identity_url().map_err(std::io::Error::other)? else {
        warn!("MURMUR_IDENTITY_URL not set; using demo identity fixtures (dev only)");
        return Ok(Arc::new(FixtureIdentityProvider::demo()));
    };
    if settings.identity_secret_key.is_none() {
        warn!("MURMUR_IDENTITY_SECRET_KEY not set; identity requests are unauthenticated");
    }
    let provider = HttpIdentityProvider::new(
        base,
        settings.identity_secret_key.clone(),
        settings.identity_timeout(),
    )
    .map_err(std::io::Error::other)?;
    Ok(Arc::new(provider))
}

async fn build_rate_limiter(
    settings: &AppSettings,
    clock: Arc<dyn Clock>,
) -> std::io::Result<Arc<dyn RateLimiter>> {
    let policy = settings.post_rate_policy();
    match settings.redis_url.as_deref() {
        Some(url) => {
            let limiter =
                RedisRateLimiter::connect(url, policy, REDIS_POOL_SIZE, REDIS_CONNECT_TIMEOUT)
                    .await
                    .map_err(std::io::Error::other)?;
            Ok(Arc::new(limiter))
        }
        None => {
            warn!("MURMUR_REDIS_URL not set; rate limits are per process (dev only)");
            Ok(Arc::new(InMemoryRateLimiter::new(policy, clock)))
        }
    }
}

/// Build the handler state from settings, connecting to every configured
/// backend.
///
/// # Errors
///
/// Fails when a configured backend is unreachable or misconfigured.
pub async fn build_http_state(settings: &AppSettings) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repositories = build_repositories(settings).await?;
    let provider = build_identity_provider(settings)?;
    let limiter = build_rate_limiter(settings, clock.clone()).await?;
    let directory = UserDirectory::new(provider.clone(), settings.identity_batch_size());

    let feed = Arc::new(
        FeedService::new(repositories.posts, directory.clone(), limiter, clock)
            .with_recent_limit(settings.recent_posts_limit())
            .with_rate_window(settings.post_rate_policy().window()),
    );
    let graph = Arc::new(SocialGraphService::new(repositories.followers, directory));

    Ok(HttpState::new(HttpStatePorts {
        login: Arc::new(IdentityLoginService::new(provider)),
        feed: feed.clone(),
        posts: feed,
        profiles: graph.clone(),
        graph: graph.clone(),
        follows: graph,
    }))
}
