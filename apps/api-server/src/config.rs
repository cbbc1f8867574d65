//! Application configuration loaded from environment variables.

use std::env;

use agora_infra::JwtConfig;
#[cfg(feature = "postgres")]
use agora_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on in-memory stores.
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 8080),
            #[cfg(feature = "postgres")]
            database: env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
                url,
                max_connections: env_or("DB_MAX_CONNECTIONS", 100),
                min_connections: env_or("DB_MIN_CONNECTIONS", 10),
            }),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
