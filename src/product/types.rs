use serde::{Deserialize, Serialize};
use validator::Validate;

use super::models::ProductModel;

fn default_per_page() -> i64 {
    10
}

fn default_current_page() -> i64 {
    1
}

/// Query string for the paginated product listing
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100, message = "perPage must be between 1 and 100"))]
    pub per_page: i64,
    #[serde(default = "default_current_page")]
    #[validate(range(min = 1, message = "currentPage must be at least 1"))]
    pub current_page: i64,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            per_page: default_per_page(),
            current_page: default_current_page(),
        }
    }
}

/// Request payload for updating a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Product name must be 1-200 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: i64,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One page of the product listing
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<ProductModel>,
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
}
