use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

const DEV_SECRET_KEY: &str = "storefront-dev-secret-change-in-production";

/// Longest accepted token lifetime, one year
pub const MAX_TOKEN_EXPIRATION_HOURS: i64 = 8760;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Runtime configuration, read once from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub secret_key: String,
    /// Token lifetime; also used as the session store TTL
    pub token_expiration_hours: i64,
    /// Postgres URL. In-memory repositories are used when unset.
    pub database_url: Option<String>,
    /// Redis URL. An in-memory session store is used when unset.
    pub redis_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("APP_SECRET_KEY").unwrap_or_else(|| {
            warn!("APP_SECRET_KEY not set, using development secret");
            DEV_SECRET_KEY.to_string()
        });

        let token_expiration_hours: i64 = parse_or(&lookup, "TOKEN_EXPIRATION_HOURS", 24)?;
        if !(1..=MAX_TOKEN_EXPIRATION_HOURS).contains(&token_expiration_hours) {
            warn!(token_expiration_hours, "TOKEN_EXPIRATION_HOURS out of range");
            return Err(ConfigError::InvalidValue {
                key: "TOKEN_EXPIRATION_HOURS".to_string(),
                reason: format!("must be between 1 and {MAX_TOKEN_EXPIRATION_HOURS}"),
            });
        }

        Ok(Self {
            port: parse_or(&lookup, "APP_PORT", 3000)?,
            secret_key,
            token_expiration_hours,
            database_url: non_empty(lookup("DATABASE_URL")),
            redis_url: non_empty(lookup("REDIS_URL")),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            }
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
