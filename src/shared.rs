use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::address::repository::AddressRepository;
use crate::customer::repository::CustomerRepository;
use crate::order::repository::OrderRepository;
use crate::product::repository::ProductRepository;
use crate::session::{store::SessionStore, TokenConfig};

/// Message returned whenever the session store cannot be reached
pub const CACHE_UNAVAILABLE_MESSAGE: &str = "It was not possible to connect to the redis server(s)";

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub token_config: TokenConfig,
    pub session_store: Arc<dyn SessionStore + Send + Sync>,
    pub customer_repository: Arc<dyn CustomerRepository + Send + Sync>,
    pub product_repository: Arc<dyn ProductRepository + Send + Sync>,
    pub address_repository: Arc<dyn AddressRepository + Send + Sync>,
    pub order_repository: Arc<dyn OrderRepository + Send + Sync>,
}

impl AppState {
    pub fn new(
        token_config: TokenConfig,
        session_store: Arc<dyn SessionStore + Send + Sync>,
        customer_repository: Arc<dyn CustomerRepository + Send + Sync>,
        product_repository: Arc<dyn ProductRepository + Send + Sync>,
        address_repository: Arc<dyn AddressRepository + Send + Sync>,
        order_repository: Arc<dyn OrderRepository + Send + Sync>,
    ) -> Self {
        Self {
            token_config,
            session_store,
            customer_repository,
            product_repository,
            address_repository,
            order_repository,
        }
    }
}

/// JSON envelope shared by every endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// A 200 response that reports an unsuccessful outcome
    pub fn soft_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{}", CACHE_UNAVAILABLE_MESSAGE)]
    CacheUnavailable,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(messages) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "message": messages })),
                )
                    .into_response();
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::CacheUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                CACHE_UNAVAILABLE_MESSAGE.to_string(),
            ),
            // Raw messages are passed through to the caller
            AppError::DatabaseError(msg) | AppError::JwtError(msg) | AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}
