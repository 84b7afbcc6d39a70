// Public API - what other modules can use
pub use handlers::{login, logout, update_info};

// Internal modules
mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod types;
