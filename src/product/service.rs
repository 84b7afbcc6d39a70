use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::ProductModel,
    repository::ProductRepository,
    types::{ProductPage, ProductQuery, ProductUpdate},
};
use crate::shared::AppError;
use crate::validation::validate_payload;

/// How many products the "latest" listing returns
pub const LATEST_PRODUCTS_LIMIT: i64 = 8;

/// Service for catalog business logic
pub struct ProductService {
    repository: Arc<dyn ProductRepository + Send + Sync>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn latest(&self) -> Result<Vec<ProductModel>, AppError> {
        self.repository.latest(LATEST_PRODUCTS_LIMIT).await
    }

    /// Lists one page of products matching the query, with the total match count
    #[instrument(skip(self))]
    pub async fn list(&self, query: ProductQuery) -> Result<ProductPage, AppError> {
        validate_payload(&query)?;

        let total = self.repository.count(&query.search).await?;
        let products = self
            .repository
            .page(&query.search, query.per_page, query.current_page)
            .await?;

        debug!(total, returned = products.len(), "Product page assembled");

        Ok(ProductPage {
            products,
            total,
            per_page: query.per_page,
            current_page: query.current_page,
        })
    }

    #[instrument(skip(self))]
    pub async fn detail(&self, product_id: i32) -> Result<ProductModel, AppError> {
        self.repository
            .get_product(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Returns true when a product row was modified
    #[instrument(skip(self, update))]
    pub async fn update(&self, product_id: i32, update: ProductUpdate) -> Result<bool, AppError> {
        validate_payload(&update)?;

        let rows = self.repository.update_product(product_id, &update).await?;
        info!(product_id, rows, "Product update executed");
        Ok(rows > 0)
    }
}
