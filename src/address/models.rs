use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for addresses table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressModel {
    pub id: i32,
    pub city: String,
    pub district: String,
    pub detail: String,
}
