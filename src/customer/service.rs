use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::CustomerProfile,
    password::PasswordHasher,
    repository::CustomerRepository,
    types::{CustomerInfoUpdate, LoginOutcome, LoginRequest, LoginResponse, UpdateInfoOutcome},
};
use crate::session::service::SessionService;
use crate::shared::AppError;
use crate::validation::validate_payload;

/// Service for customer authentication and profile business logic
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository + Send + Sync>,
    sessions: SessionService,
    hasher: PasswordHasher,
}

impl CustomerService {
    pub fn new(
        repository: Arc<dyn CustomerRepository + Send + Sync>,
        sessions: SessionService,
    ) -> Self {
        Self {
            repository,
            sessions,
            hasher: PasswordHasher::new(),
        }
    }

    /// Checks credentials and, on success, opens a session for the customer
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AppError> {
        validate_payload(&request)?;

        let customer = match self.repository.find_by_username(&request.username).await? {
            Some(customer) => customer,
            None => {
                warn!("Login rejected: unknown username");
                return Ok(LoginOutcome::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify(&request.password, &customer.password_hash)
            .await?
        {
            warn!(customer_id = customer.id, "Login rejected: wrong password");
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let access_token = self
            .sessions
            .open_session(customer.id, &customer.username)
            .await?;

        info!(customer_id = customer.id, "Customer logged in");

        Ok(LoginOutcome::Authenticated(LoginResponse {
            access_token,
            user: CustomerProfile::from(&customer),
        }))
    }

    /// Removes the session stored under the raw header value
    #[instrument(skip_all)]
    pub async fn logout(&self, authorization: Option<&str>) -> Result<(), AppError> {
        if self.sessions.close_session(authorization).await? {
            info!("Customer logged out");
            Ok(())
        } else {
            Err(AppError::Unauthorized("Logged out fail".to_string()))
        }
    }

    /// Updates the profile of the customer whose session the header names
    #[instrument(skip_all)]
    pub async fn update_info(
        &self,
        authorization: Option<&str>,
        update: CustomerInfoUpdate,
    ) -> Result<UpdateInfoOutcome, AppError> {
        validate_payload(&update)?;

        let token = self.sessions.lookup(authorization).await?.ok_or_else(|| {
            warn!("Update info rejected: session not found");
            AppError::Unauthorized("Unauthorized".to_string())
        })?;

        let Some(customer_id) = self.sessions.token_config().customer_id(&token) else {
            warn!("Stored session token does not name a customer");
            return Ok(UpdateInfoOutcome::CustomerMissing);
        };

        let rows = self.repository.update_info(customer_id, &update).await?;
        if rows > 0 {
            info!(customer_id, "Customer info updated");
            Ok(UpdateInfoOutcome::Updated { customer_id })
        } else {
            warn!(customer_id, "Customer info update modified no rows");
            Ok(UpdateInfoOutcome::NotUpdated)
        }
    }
}
