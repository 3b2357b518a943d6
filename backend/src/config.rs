//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from CLI flags or `MURMUR_*` environment variables.
//! Unset optional backends select the in-memory or fixture adapters.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::ports::{DEFAULT_POST_PERMITS, DEFAULT_POST_WINDOW, RateLimitPolicy};
use crate::domain::{DEFAULT_IDENTITY_BATCH_SIZE, DEFAULT_RECENT_POSTS_LIMIT};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_DB_POOL_SIZE: u32 = 10;

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid identity provider URL '{value}': {source}")]
    IdentityUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MURMUR")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum PostgreSQL pool size.
    pub database_pool_size: Option<u32>,
    /// Redis connection string for the shared rate limiter.
    pub redis_url: Option<String>,
    /// Identity provider base URL.
    pub identity_url: Option<String>,
    /// Bearer secret for the identity provider.
    pub identity_secret_key: Option<String>,
    pub identity_timeout_secs: Option<u64>,
    /// Ids per identity provider batch lookup.
    pub identity_batch_size: Option<usize>,
    /// Posts allowed per window per user.
    pub post_rate_limit: Option<u32>,
    pub post_rate_window_secs: Option<u64>,
    /// Size of the recent posts window.
    pub recent_posts_limit: Option<usize>,
    /// Apply pending migrations on startup. Defaults to `true`.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Parsed identity provider URL, or `None` when unset.
    pub fn identity_url(&self) -> Result<Option<Url>, SettingsError> {
        self.identity_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|source| SettingsError::IdentityUrl {
                    value: raw.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    pub fn database_pool_size(&self) -> u32 {
        self.database_pool_size.unwrap_or(DEFAULT_DB_POOL_SIZE)
    }

    pub fn identity_timeout(&self) -> Duration {
        self.identity_timeout_secs.map_or(DEFAULT_IDENTITY_TIMEOUT, Duration::from_secs)
    }

    pub fn identity_batch_size(&self) -> usize {
        self.identity_batch_size.unwrap_or(DEFAULT_IDENTITY_BATCH_SIZE)
    }

    pub fn recent_posts_limit(&self) -> usize {
        self.recent_posts_limit.unwrap_or(DEFAULT_RECENT_POSTS_LIMIT)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Rate-limit policy for post creation.
    pub fn post_rate_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(
            self.post_rate_limit.unwrap_or(DEFAULT_POST_PERMITS),
            self.post_rate_window_secs.map_or(DEFAULT_POST_WINDOW, Duration::from_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 8] = [
        "MURMUR_BIND_ADDR",
        "MURMUR_DATABASE_URL",
        "MURMUR_REDIS_URL",
        "MURMUR_IDENTITY_URL",
        "MURMUR_IDENTITY_BATCH_SIZE",
        "MURMUR_POST_RATE_LIMIT",
        "MURMUR_POST_RATE_WINDOW_SECS",
        "MURMUR_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("murmur")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.redis_url.is_none());
        assert!(settings.identity_url().expect("unset").is_none());
        assert_eq!(settings.identity_batch_size(), 100);
        assert_eq!(settings.recent_posts_limit(), 100);
        assert_eq!(settings.identity_timeout(), Duration::from_secs(10));
        assert_eq!(settings.post_rate_policy().permits(), 5);
        assert_eq!(settings.post_rate_policy().window(), Duration::from_secs(60));
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MURMUR_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("MURMUR_DATABASE_URL", None),
            ("MURMUR_REDIS_URL", Some("redis://cache:6379".to_owned())),
            ("MURMUR_IDENTITY_URL", Some("https://id.example.test".to_owned())),
            ("MURMUR_IDENTITY_BATCH_SIZE", Some("25".to_owned())),
            ("MURMUR_POST_RATE_LIMIT", Some("2".to_owned())),
            ("MURMUR_POST_RATE_WINDOW_SECS", Some("10".to_owned())),
            ("MURMUR_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr().expect("addr").port(), 9000);
        assert_eq!(settings.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(
            settings
                .identity_url()
                .expect("valid url")
                .map(|url| url.host_str().map(str::to_owned)),
            Some(Some("id.example.test".to_owned()))
        );
        assert_eq!(settings.identity_batch_size(), 25);
        assert_eq!(
            settings.post_rate_policy(),
            RateLimitPolicy::new(2, Duration::from_secs(10))
        );
        assert!(!settings.run_migrations());
    }

    #[rstest]
    fn malformed_values_are_reported() {
        let _guard = lock_env([
            ("MURMUR_BIND_ADDR", Some("nowhere".to_owned())),
            ("MURMUR_IDENTITY_URL", Some("not a url".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
        assert!(matches!(
            settings.identity_url(),
            Err(SettingsError::IdentityUrl { .. })
        ));
    }
}
