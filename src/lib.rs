// Library crate for the storefront API server
// This file exposes the public API for the binary and integration tests

pub mod address;
pub mod app;
pub mod config;
pub mod customer;
pub mod order;
pub mod product;
pub mod session;
pub mod shared;
pub mod validation;

// Re-export commonly used types for easier access in tests
pub use app::router;
pub use config::AppConfig;
pub use session::{bearer_key, SessionClaims, TokenConfig};
pub use shared::{ApiResponse, AppError, AppState};
