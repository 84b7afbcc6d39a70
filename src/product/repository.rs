use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::{models::ProductModel, types::ProductUpdate};
use crate::shared::AppError;

/// Trait for product repository operations
#[async_trait]
pub trait ProductRepository {
    /// Most recently created products, newest first
    async fn latest(&self, limit: i64) -> Result<Vec<ProductModel>, AppError>;
    /// Number of products whose name matches `search`
    async fn count(&self, search: &str) -> Result<i64, AppError>;
    /// One page of matching products ordered by id; `current_page` is 1-based
    async fn page(
        &self,
        search: &str,
        per_page: i64,
        current_page: i64,
    ) -> Result<Vec<ProductModel>, AppError>;
    async fn get_product(&self, product_id: i32) -> Result<Option<ProductModel>, AppError>;
    /// Returns the number of rows modified
    async fn update_product(&self, product_id: i32, update: &ProductUpdate)
        -> Result<u64, AppError>;
}

/// In-memory implementation of ProductRepository for development and testing
pub struct InMemoryProductRepository {
    products: Mutex<BTreeMap<i32, ProductModel>>,
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(BTreeMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated products
    pub fn with_products(products: Vec<ProductModel>) -> Self {
        let product_map = products.into_iter().map(|p| (p.id, p)).collect();
        Self {
            products: Mutex::new(product_map),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<i32, ProductModel>>, AppError> {
        self.products
            .lock()
            .map_err(|_| AppError::DatabaseError("Product store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self))]
    async fn latest(&self, limit: i64) -> Result<Vec<ProductModel>, AppError> {
        let products = self.lock()?;
        let mut latest: Vec<ProductModel> = products.values().cloned().collect();
        latest.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        latest.truncate(limit.max(0) as usize);

        debug!(count = latest.len(), "Latest products listed from memory");
        Ok(latest)
    }

    #[instrument(skip(self))]
    async fn count(&self, search: &str) -> Result<i64, AppError> {
        let products = self.lock()?;
        Ok(products.values().filter(|p| p.matches_search(search)).count() as i64)
    }

    #[instrument(skip(self))]
    async fn page(
        &self,
        search: &str,
        per_page: i64,
        current_page: i64,
    ) -> Result<Vec<ProductModel>, AppError> {
        let Some(offset) = page_offset(per_page, current_page) else {
            debug!("Requested page lies beyond any addressable row");
            return Ok(Vec::new());
        };
        let products = self.lock()?;

        // BTreeMap iteration is already ordered by id
        let page: Vec<ProductModel> = products
            .values()
            .filter(|p| p.matches_search(search))
            .skip(offset as usize)
            .take(per_page.max(0) as usize)
            .cloned()
            .collect();

        debug!(count = page.len(), "Product page listed from memory");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn get_product(&self, product_id: i32) -> Result<Option<ProductModel>, AppError> {
        let products = self.lock()?;
        Ok(products.get(&product_id).cloned())
    }

    #[instrument(skip(self, update))]
    async fn update_product(
        &self,
        product_id: i32,
        update: &ProductUpdate,
    ) -> Result<u64, AppError> {
        let mut products = self.lock()?;
        let Some(product) = products.get_mut(&product_id) else {
            warn!(product_id, "Product not found for update in memory");
            return Ok(0);
        };

        product.name = update.name.clone();
        product.description = update.description.clone();
        product.price = update.price;
        product.quantity = update.quantity;
        product.image_url = update.image_url.clone();

        debug!(product_id, "Product updated in memory");
        Ok(1)
    }
}

/// PostgreSQL implementation of product repository
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row offset of a 1-based page; `None` when it does not fit in an i64
fn page_offset(per_page: i64, current_page: i64) -> Option<i64> {
    current_page.saturating_sub(1).max(0).checked_mul(per_page.max(0))
}

fn search_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn database_error(e: sqlx::Error) -> AppError {
    warn!(error = %e, "Product query failed");
    AppError::DatabaseError(e.to_string())
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self))]
    async fn latest(&self, limit: i64) -> Result<Vec<ProductModel>, AppError> {
        debug!("Fetching latest products from database");

        sqlx::query_as::<_, ProductModel>(
            "SELECT id, name, description, price, quantity, image_url, created_at FROM products ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn count(&self, search: &str) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE name ILIKE $1")
            .bind(search_pattern(search))
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;

        debug!(count, "Counted matching products in database");
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn page(
        &self,
        search: &str,
        per_page: i64,
        current_page: i64,
    ) -> Result<Vec<ProductModel>, AppError> {
        let Some(offset) = page_offset(per_page, current_page) else {
            debug!("Requested page lies beyond any addressable row");
            return Ok(Vec::new());
        };
        debug!(offset, "Fetching product page from database");

        sqlx::query_as::<_, ProductModel>(
            "SELECT id, name, description, price, quantity, image_url, created_at FROM products WHERE name ILIKE $1 ORDER BY id LIMIT $2 OFFSET $3",
        )
        .bind(search_pattern(search))
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn get_product(&self, product_id: i32) -> Result<Option<ProductModel>, AppError> {
        debug!(product_id, "Fetching product from database");

        sqlx::query_as::<_, ProductModel>(
            "SELECT id, name, description, price, quantity, image_url, created_at FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    #[instrument(skip(self, update))]
    async fn update_product(
        &self,
        product_id: i32,
        update: &ProductUpdate,
    ) -> Result<u64, AppError> {
        debug!(product_id, "Updating product in database");

        let result = sqlx::query(
            "UPDATE products SET name = $2, description = $3, price = $4, quantity = $5, image_url = $6 WHERE id = $1",
        )
        .bind(product_id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.price)
        .bind(update.quantity)
        .bind(&update.image_url)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
