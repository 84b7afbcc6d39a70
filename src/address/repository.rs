use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::AddressModel;
use crate::shared::AppError;

/// Trait for address repository operations
#[async_trait]
pub trait AddressRepository {
    async fn list_addresses(&self) -> Result<Vec<AddressModel>, AppError>;
    async fn get_address(&self, address_id: i32) -> Result<Option<AddressModel>, AppError>;
}

/// In-memory implementation of AddressRepository for development and testing
pub struct InMemoryAddressRepository {
    addresses: Mutex<Vec<AddressModel>>,
}

impl Default for InMemoryAddressRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAddressRepository {
    pub fn new() -> Self {
        Self {
            addresses: Mutex::new(Vec::new()),
        }
    }

    pub fn with_addresses(mut addresses: Vec<AddressModel>) -> Self {
        addresses.sort_by_key(|a| a.id);
        Self {
            addresses: Mutex::new(addresses),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<AddressModel>>, AppError> {
        self.addresses
            .lock()
            .map_err(|_| AppError::DatabaseError("Address store lock poisoned".to_string()))
    }
}

#[async_trait]
impl AddressRepository for InMemoryAddressRepository {
    #[instrument(skip(self))]
    async fn list_addresses(&self) -> Result<Vec<AddressModel>, AppError> {
        let addresses = self.lock()?;
        debug!(count = addresses.len(), "Addresses listed from memory");
        Ok(addresses.clone())
    }

    #[instrument(skip(self))]
    async fn get_address(&self, address_id: i32) -> Result<Option<AddressModel>, AppError> {
        let addresses = self.lock()?;
        Ok(addresses.iter().find(|a| a.id == address_id).cloned())
    }
}

/// PostgreSQL implementation of address repository
pub struct PostgresAddressRepository {
    pool: PgPool,
}

impl PostgresAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for PostgresAddressRepository {
    #[instrument(skip(self))]
    async fn list_addresses(&self) -> Result<Vec<AddressModel>, AppError> {
        debug!("Fetching addresses from database");

        sqlx::query_as::<_, AddressModel>(
            "SELECT id, city, district, detail FROM addresses ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list addresses");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn get_address(&self, address_id: i32) -> Result<Option<AddressModel>, AppError> {
        sqlx::query_as::<_, AddressModel>(
            "SELECT id, city, district, detail FROM addresses WHERE id = $1",
        )
        .bind(address_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, address_id, "Failed to fetch address");
            AppError::DatabaseError(e.to_string())
        })
    }
}
