// Public API - what other modules can use
pub use handlers::{latest_products, list_products, product_detail, update_product};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
