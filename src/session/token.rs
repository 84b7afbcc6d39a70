use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::SessionClaims;
use crate::config::AppConfig;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration_hours: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.secret_key.clone(), config.token_expiration_hours)
    }

    /// Lifetime of a minted token, also used as the session store TTL
    pub fn session_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs((self.expiration_hours.max(0) as u64).saturating_mul(3600))
    }

    /// Creates a signed token for the given customer
    #[instrument(skip(self, username))]
    pub fn create_token(&self, customer_id: i32, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = Duration::try_hours(self.expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AppError::JwtError("Token lifetime out of range".to_string()))?
            .timestamp() as usize;

        debug!(
            expiration_hours = self.expiration_hours,
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = SessionClaims {
            customer_id,
            username: username.to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates a token's signature and expiry and returns its claims
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        debug!("Decoding and validating JWT token");

        // Expiry is checked without clock skew tolerance
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| {
            debug!(
                customer_id = data.claims.customer_id,
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Recovers the customer id from a token, or `None` when the token does
    /// not decode or carries a negative id
    pub fn customer_id(&self, token: &str) -> Option<i32> {
        self.validate_token(token)
            .ok()
            .map(|claims| claims.customer_id)
            .filter(|id| *id >= 0)
    }
}
