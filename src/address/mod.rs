pub use handlers::list_addresses;

mod handlers;
pub mod models;
pub mod repository;
