use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    store::SessionStore,
    token::TokenConfig,
    types::{bearer_key, SessionClaims},
};
use crate::shared::AppError;

/// Service for the session lifecycle: mint, look up, revoke
pub struct SessionService {
    token_config: TokenConfig,
    store: Arc<dyn SessionStore + Send + Sync>,
}

impl SessionService {
    pub fn new(token_config: TokenConfig, store: Arc<dyn SessionStore + Send + Sync>) -> Self {
        Self {
            token_config,
            store,
        }
    }

    /// Mints a token for the customer and registers it under `"Bearer " + token`
    #[instrument(skip(self, username))]
    pub async fn open_session(&self, customer_id: i32, username: &str) -> Result<String, AppError> {
        let token = self.token_config.create_token(customer_id, username)?;

        self.store
            .set(&bearer_key(&token), &token, self.token_config.session_ttl())
            .await?;

        info!(customer_id, "Session registered");
        Ok(token)
    }

    /// Returns the stored token for a raw `Authorization` header value
    #[instrument(skip_all)]
    pub async fn lookup(&self, authorization: Option<&str>) -> Result<Option<String>, AppError> {
        match authorization {
            Some(key) if !key.is_empty() => self.store.get(key).await,
            _ => Ok(None),
        }
    }

    /// Deletes the session stored under the header value.
    /// Returns false when there was nothing to delete.
    #[instrument(skip_all)]
    pub async fn close_session(&self, authorization: Option<&str>) -> Result<bool, AppError> {
        let Some(key) = authorization else {
            return Ok(false);
        };

        if self.lookup(Some(key)).await?.is_none() {
            warn!("Attempt to close a session that is not active");
            return Ok(false);
        }

        self.store.delete(key).await?;
        info!("Session closed");
        Ok(true)
    }

    /// Looks up the header value and decodes the stored token into claims
    #[instrument(skip_all)]
    pub async fn validate_session(
        &self,
        authorization: Option<&str>,
    ) -> Result<SessionClaims, AppError> {
        let token = self.lookup(authorization).await?.ok_or_else(|| {
            warn!("Session not found or has been revoked");
            AppError::Unauthorized("Unauthorized".to_string())
        })?;

        self.token_config.validate_token(&token).map_err(|e| {
            warn!("Stored session token failed validation: {}", e);
            AppError::Unauthorized("Unauthorized".to_string())
        })
    }

    pub fn token_config(&self) -> &TokenConfig {
        &self.token_config
    }
}
