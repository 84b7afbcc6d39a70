use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for customers table
#[derive(Debug, Clone, FromRow)]
pub struct CustomerModel {
    pub id: i32,
    pub username: String,
    pub password_hash: String, // Argon2 PHC string
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Customer data safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub customer_id: i32,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<&CustomerModel> for CustomerProfile {
    fn from(customer: &CustomerModel) -> Self {
        Self {
            customer_id: customer.id,
            username: customer.username.clone(),
            full_name: customer.full_name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
        }
    }
}
