use serde::{Deserialize, Serialize};
use validator::Validate;

use super::models::CustomerProfile;
use crate::validation::non_blank;

/// Request payload for customer login
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = "non_blank", message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "non_blank", message = "Password is required"))]
    pub password: String,
}

/// Request payload for updating profile fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInfoUpdate {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 9, max = 15, message = "Phone must be 9-15 characters"))]
    pub phone: String,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: String,
}

/// Successful login payload
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: CustomerProfile,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedCustomer {
    pub customer_id: i32,
}

/// Outcome of a login attempt that did not fail with an error
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(LoginResponse),
    /// Unknown username or wrong password
    InvalidCredentials,
}

/// Outcome of an update-info call made with an active session
#[derive(Debug, PartialEq)]
pub enum UpdateInfoOutcome {
    Updated { customer_id: i32 },
    /// The update touched no rows
    NotUpdated,
    /// The stored token did not yield a usable customer id
    CustomerMissing,
}
