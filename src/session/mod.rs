// Public API - what other modules can use
pub use cleanup_task::{start_session_purge_task, DEFAULT_PURGE_INTERVAL};
pub use middleware::require_session;
pub use token::TokenConfig;
pub use types::{bearer_key, SessionClaims, BEARER_PREFIX};

// Internal modules
mod cleanup_task;
mod middleware;
pub mod redis_store;
pub mod service;
pub mod store;
mod token;
mod types;
