use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    models::{NewOrder, NewOrderLine, OrderStatus, OrderWithLines},
    repository::OrderRepository,
    types::PlaceOrderRequest,
};
use crate::address::repository::AddressRepository;
use crate::product::repository::ProductRepository;
use crate::shared::AppError;
use crate::validation::validate_payload;

pub const ORDER_TOTAL_TOO_LARGE: &str = "Order total is too large";

/// Service for order business logic
pub struct OrderService {
    orders: Arc<dyn OrderRepository + Send + Sync>,
    products: Arc<dyn ProductRepository + Send + Sync>,
    addresses: Arc<dyn AddressRepository + Send + Sync>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository + Send + Sync>,
        products: Arc<dyn ProductRepository + Send + Sync>,
        addresses: Arc<dyn AddressRepository + Send + Sync>,
    ) -> Self {
        Self {
            orders,
            products,
            addresses,
        }
    }

    /// Places an order for the customer, pricing each line at the product's
    /// current price
    #[instrument(skip(self, request))]
    pub async fn place_order(
        &self,
        customer_id: i32,
        request: PlaceOrderRequest,
    ) -> Result<OrderWithLines, AppError> {
        validate_payload(&request)?;

        if self
            .addresses
            .get_address(request.address_id)
            .await?
            .is_none()
        {
            warn!(address_id = request.address_id, "Order rejected: unknown address");
            return Err(AppError::NotFound("Address not found".to_string()));
        }

        let mut lines = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = self
                .products
                .get_product(item.product_id)
                .await?
                .ok_or_else(|| {
                    warn!(product_id = item.product_id, "Order rejected: unknown product");
                    AppError::NotFound(format!("Product {} not found", item.product_id))
                })?;

            lines.push(NewOrderLine {
                product_id: product.id,
                quantity: item.quantity,
                unit_price: product.price,
            });
        }

        let total = lines
            .iter()
            .try_fold(0i64, |total, line| total.checked_add(line.subtotal()?))
            .ok_or_else(|| {
                warn!("Order rejected: total overflows");
                AppError::Validation(vec![ORDER_TOTAL_TOO_LARGE.to_string()])
            })?;

        let created = self
            .orders
            .create_order(&NewOrder {
                code: Uuid::new_v4(),
                customer_id,
                address_id: request.address_id,
                status: OrderStatus::Pending,
                total,
                lines,
            })
            .await?;

        info!(
            order_id = created.order.id,
            order_code = %created.order.code,
            total = created.order.total,
            "Order placed"
        );
        Ok(created)
    }

    /// Lists the customer's orders, newest first, each with its lines
    #[instrument(skip(self))]
    pub async fn list_orders(&self, customer_id: i32) -> Result<Vec<OrderWithLines>, AppError> {
        let orders = self.orders.list_for_customer(customer_id).await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let lines = self.orders.lines_for_order(order.id).await?;
            result.push(OrderWithLines { order, lines });
        }

        Ok(result)
    }
}
