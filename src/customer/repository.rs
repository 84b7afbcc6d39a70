use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::{models::CustomerModel, types::CustomerInfoUpdate};
use crate::shared::AppError;

/// Trait for customer repository operations
#[async_trait]
pub trait CustomerRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<CustomerModel>, AppError>;
    /// Applies the profile fields and returns the number of rows modified
    async fn update_info(
        &self,
        customer_id: i32,
        update: &CustomerInfoUpdate,
    ) -> Result<u64, AppError>;
}

/// In-memory implementation of CustomerRepository for development and testing
pub struct InMemoryCustomerRepository {
    customers: Mutex<HashMap<i32, CustomerModel>>,
}

impl Default for InMemoryCustomerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self {
            customers: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated customers
    pub fn with_customers(customers: Vec<CustomerModel>) -> Self {
        let customer_map = customers.into_iter().map(|c| (c.id, c)).collect();
        Self {
            customers: Mutex::new(customer_map),
        }
    }

    /// Returns a snapshot of the stored customer
    pub fn customer(&self, customer_id: i32) -> Option<CustomerModel> {
        self.lock()
            .ok()
            .and_then(|customers| customers.get(&customer_id).cloned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<i32, CustomerModel>>, AppError> {
        self.customers
            .lock()
            .map_err(|_| AppError::DatabaseError("Customer store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<CustomerModel>, AppError> {
        debug!(username = %username, "Fetching customer by username from memory");

        let customers = self.lock()?;
        Ok(customers
            .values()
            .find(|customer| customer.username == username)
            .cloned())
    }

    #[instrument(skip(self, update))]
    async fn update_info(
        &self,
        customer_id: i32,
        update: &CustomerInfoUpdate,
    ) -> Result<u64, AppError> {
        debug!(customer_id, "Updating customer info in memory");

        let mut customers = self.lock()?;
        let Some(customer) = customers.get_mut(&customer_id) else {
            warn!(customer_id, "Customer not found for update in memory");
            return Ok(0);
        };

        customer.full_name = update.full_name.clone();
        customer.email = update.email.clone();
        customer.phone = update.phone.clone();
        customer.address = update.address.clone();

        debug!(customer_id, "Customer info updated in memory");
        Ok(1)
    }
}

/// PostgreSQL implementation of customer repository
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CUSTOMER_COLUMNS: &str = "id, username, password_hash, full_name, email, phone, address";

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<CustomerModel>, AppError> {
        debug!(username = %username, "Fetching customer by username from database");

        sqlx::query_as::<_, CustomerModel>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch customer from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self, update))]
    async fn update_info(
        &self,
        customer_id: i32,
        update: &CustomerInfoUpdate,
    ) -> Result<u64, AppError> {
        debug!(customer_id, "Updating customer info in database");

        let result = sqlx::query(
            "UPDATE customers SET full_name = $2, email = $3, phone = $4, address = $5 WHERE id = $1",
        )
        .bind(customer_id)
        .bind(&update.full_name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.address)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, customer_id, "Failed to update customer info in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(
            customer_id,
            rows_affected = result.rows_affected(),
            "Customer info update executed"
        );
        Ok(result.rows_affected())
    }
}
