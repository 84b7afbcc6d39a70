use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use crate::shared::AppError;

/// Key-value store holding active session tokens with a per-entry TTL
#[async_trait]
pub trait SessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

struct StoredEntry {
    value: String,
    expires_at: Instant,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory session store for development and testing
///
/// Expired entries are dropped lazily when read, or in bulk through
/// `purge_expired`.
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredEntry>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::Internal("Session store lock poisoned".to_string()))
    }

    /// Returns the number of live entries
    pub fn session_count(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .map(|entries| entries.values().filter(|e| !e.is_expired(now)).count())
            .unwrap_or(0)
    }

    /// Checks if a live entry exists under `key`
    pub fn has_session(&self, key: &str) -> bool {
        let now = Instant::now();
        self.lock()
            .map(|entries| entries.get(key).is_some_and(|e| !e.is_expired(now)))
            .unwrap_or(false)
    }

    /// Removes every expired entry and returns how many were dropped
    #[instrument(skip(self))]
    pub fn purge_expired(&self) -> Result<u64, AppError> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        let initial_count = entries.len();

        entries.retain(|_, entry| !entry.is_expired(now));

        let removed_count = initial_count - entries.len();
        debug!(
            expired_sessions_removed = removed_count,
            "Expired sessions purged from memory"
        );
        Ok(removed_count as u64)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    #[instrument(skip_all)]
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut entries = self.lock()?;
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                debug!("Session entry expired, evicting");
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => {
                debug!("Session entry not found in memory");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, key, value))]
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| AppError::Internal("Session TTL out of range".to_string()))?;

        let mut entries = self.lock()?;
        entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        debug!(ttl_secs = ttl.as_secs(), "Session entry stored in memory");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.lock()?;
        entries.remove(key);
        debug!("Session entry removed from memory");
        Ok(())
    }
}
