use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Lifecycle state of an order, stored as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipping,
    Delivered,
    Cancelled,
}

/// Database model for orders table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderModel {
    pub id: i32,
    pub code: Uuid,
    pub customer_id: i32,
    pub address_id: i32,
    pub status: OrderStatus,
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

/// Database model for order_details table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineModel {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i64,
}

/// Order data to insert; ids are assigned by the repository
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub code: Uuid,
    pub customer_id: i32,
    pub address_id: i32,
    pub status: OrderStatus,
    pub total: i64,
    pub lines: Vec<NewOrderLine>,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i64,
}

impl NewOrderLine {
    /// Unit price times quantity; `None` on overflow
    pub fn subtotal(&self) -> Option<i64> {
        self.unit_price.checked_mul(self.quantity as i64)
    }
}

/// An order together with its lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: OrderModel,
    pub lines: Vec<OrderLineModel>,
}
