use std::time::Duration;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} is not a valid value: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    /// Session lifetime in minutes.
    pub jwt_maxage: i64,
    pub port: u16,
    pub db_max_connections: u32,
    pub allowed_origins: Vec<String>,
    pub log_level: LevelFilter,
    // Google OAuth
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_url: String,
    // Access metering
    pub basic_plan_views: i32,
    pub store_timeout: Duration,
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;
        let jwt_maxage = required("JWT_MAXAGE")?;
        let jwt_maxage = jwt_maxage
            .parse::<i64>()
            .map_err(|_| ConfigError::Invalid("JWT_MAXAGE", jwt_maxage))?;
        let app_url = required("APP_URL")?;

        let google_client_id = required("GOOGLE_CLIENT_ID")?;
        let google_client_secret = required("GOOGLE_CLIENT_SECRET")?;
        let google_redirect_url = std::env::var("GOOGLE_REDIRECT_URL")
            .unwrap_or_else(|_| format!("{}/api/oauth/google/callback", app_url));

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let log_level = parsed("LOG_LEVEL", LevelFilter::DEBUG)?;
        let store_timeout_ms = parsed::<u64>("STORE_TIMEOUT_MS", 5000)?;

        Ok(Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage,
            port: parsed("PORT", 8000)?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 10)?,
            allowed_origins,
            log_level,
            google_client_id,
            google_client_secret,
            google_redirect_url,
            basic_plan_views: parsed("BASIC_PLAN_VIEWS", 5)?,
            store_timeout: Duration::from_millis(store_timeout_ms),
        })
    }

    /// Config for tests only.
    pub fn test_default() -> Config {
        Config {
            database_url: "postgres://localhost/meetwise_test".to_string(),
            app_url: "http://localhost:3000".to_string(),
            jwt_secret: "test_jwt_secret_key".to_string(),
            jwt_maxage: 60,
            port: 8000,
            db_max_connections: 5,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            log_level: LevelFilter::DEBUG,
            google_client_id: "test_client_id".to_string(),
            google_client_secret: "test_client_secret".to_string(),
            google_redirect_url: "http://localhost:8000/api/oauth/google/callback".to_string(),
            basic_plan_views: 5,
            store_timeout: Duration::from_secs(5),
        }
    }
}
