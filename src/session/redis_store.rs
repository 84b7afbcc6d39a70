use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::store::SessionStore;
use crate::shared::AppError;

/// Redis-backed session store
///
/// Entries are written with `SET key value EX ttl` so expiry is enforced by
/// Redis itself.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    /// Opens a reconnecting connection to the Redis server at `url`
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        info!(url = %mask_redis_url(url), "Connecting to Redis");

        let client = Client::open(url).map_err(map_redis_error)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;

        info!("Successfully connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    #[instrument(skip_all)]
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(map_redis_error)?;
        debug!(found = value.is_some(), "Session lookup in Redis");
        Ok(value)
    }

    #[instrument(skip(self, key, value))]
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        // Redis rejects EX 0, so sub-second TTLs round up to one second
        let seconds = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(key, value, seconds)
            .await
            .map_err(map_redis_error)?;
        debug!(ttl_secs = seconds, "Session entry stored in Redis");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await.map_err(map_redis_error)?;
        debug!("Session entry removed from Redis");
        Ok(())
    }
}

/// Connection-level failures collapse into `CacheUnavailable`; anything else
/// keeps its message
fn map_redis_error(e: RedisError) -> AppError {
    if e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout() || e.is_io_error()
    {
        warn!(error = %e, "Redis connection failure");
        AppError::CacheUnavailable
    } else {
        warn!(error = %e, "Redis command failed");
        AppError::Internal(e.to_string())
    }
}

/// Mask password in Redis URL for safe logging
fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
