// Public API - what other modules can use
pub use handlers::{list_orders, place_order};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
