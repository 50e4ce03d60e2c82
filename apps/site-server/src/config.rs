//! Application configuration loaded from environment variables.

use std::env;

use myco_infra::EmailAdminPolicy;
use myco_infra::database::DatabaseConfig;

/// Settings the server refuses to start with.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[cfg(feature = "auth")]
    #[error(transparent)]
    Jwt(#[from] myco_infra::JwtConfigError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` keeps blog posts in the in-memory document store.
    pub database: Option<DatabaseConfig>,
    pub admin: EmailAdminPolicy,
    #[cfg(feature = "auth")]
    pub jwt: myco_infra::JwtConfig,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: myco_infra::RateLimitConfig,
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Unset means the default; set but unparseable is an error.
fn require_parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_env("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_env("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: require_parsed("PORT", 8080)?,
            database,
            admin: EmailAdminPolicy::from_env(),
            #[cfg(feature = "auth")]
            jwt: myco_infra::JwtConfig::from_env()?,
            #[cfg(feature = "rate-limit")]
            rate_limit: myco_infra::RateLimitConfig::from_env(),
        })
    }
}
