use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{NewOrder, OrderLineModel, OrderModel, OrderStatus, OrderWithLines};
use crate::shared::AppError;

/// Trait for order and order line repository operations
#[async_trait]
pub trait OrderRepository {
    /// Inserts the order and all of its lines atomically
    async fn create_order(&self, order: &NewOrder) -> Result<OrderWithLines, AppError>;
    /// The customer's orders, newest first
    async fn list_for_customer(&self, customer_id: i32) -> Result<Vec<OrderModel>, AppError>;
    async fn lines_for_order(&self, order_id: i32) -> Result<Vec<OrderLineModel>, AppError>;
}

#[derive(Default)]
struct OrderTables {
    orders: Vec<OrderModel>,
    lines: Vec<OrderLineModel>,
}

/// In-memory implementation of OrderRepository for development and testing
pub struct InMemoryOrderRepository {
    tables: Mutex<OrderTables>,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(OrderTables::default()),
        }
    }

    pub fn order_count(&self) -> usize {
        self.tables
            .lock()
            .map(|tables| tables.orders.len())
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, OrderTables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::DatabaseError("Order store lock poisoned".to_string()))
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    #[instrument(skip(self, order), fields(customer_id = order.customer_id))]
    async fn create_order(&self, order: &NewOrder) -> Result<OrderWithLines, AppError> {
        let mut tables = self.lock()?;

        let order_id = tables.orders.len() as i32 + 1;
        let stored = OrderModel {
            id: order_id,
            code: order.code,
            customer_id: order.customer_id,
            address_id: order.address_id,
            status: order.status,
            total: order.total,
            created_at: Utc::now(),
        };

        let first_line_id = tables.lines.len() as i32 + 1;
        let lines: Vec<OrderLineModel> = order
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| OrderLineModel {
                id: first_line_id + i as i32,
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        tables.orders.push(stored.clone());
        tables.lines.extend(lines.iter().cloned());

        debug!(order_id, line_count = lines.len(), "Order created in memory");
        Ok(OrderWithLines {
            order: stored,
            lines,
        })
    }

    #[instrument(skip(self))]
    async fn list_for_customer(&self, customer_id: i32) -> Result<Vec<OrderModel>, AppError> {
        let tables = self.lock()?;
        let mut orders: Vec<OrderModel> = tables
            .orders
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    #[instrument(skip(self))]
    async fn lines_for_order(&self, order_id: i32) -> Result<Vec<OrderLineModel>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .lines
            .iter()
            .filter(|l| l.order_id == order_id)
            .cloned()
            .collect())
    }
}

/// PostgreSQL implementation of order repository
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> AppError {
    warn!(error = %e, "Order query failed");
    AppError::DatabaseError(e.to_string())
}

fn order_from_row(row: &PgRow) -> Result<OrderModel, AppError> {
    let status: String = row.try_get("status").map_err(database_error)?;
    let status = OrderStatus::from_str(&status)
        .map_err(|_| AppError::DatabaseError(format!("Unknown order status '{}'", status)))?;

    Ok(OrderModel {
        id: row.try_get("id").map_err(database_error)?,
        code: row.try_get("code").map_err(database_error)?,
        customer_id: row.try_get("customer_id").map_err(database_error)?,
        address_id: row.try_get("address_id").map_err(database_error)?,
        status,
        total: row.try_get("total").map_err(database_error)?,
        created_at: row.try_get("created_at").map_err(database_error)?,
    })
}

fn line_from_row(row: &PgRow) -> Result<OrderLineModel, AppError> {
    Ok(OrderLineModel {
        id: row.try_get("id").map_err(database_error)?,
        order_id: row.try_get("order_id").map_err(database_error)?,
        product_id: row.try_get("product_id").map_err(database_error)?,
        quantity: row.try_get("quantity").map_err(database_error)?,
        unit_price: row.try_get("unit_price").map_err(database_error)?,
    })
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[instrument(skip(self, order), fields(customer_id = order.customer_id))]
    async fn create_order(&self, order: &NewOrder) -> Result<OrderWithLines, AppError> {
        debug!("Creating order in database");

        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let row = sqlx::query(
            "INSERT INTO orders (code, customer_id, address_id, status, total, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, code, customer_id, address_id, status, total, created_at",
        )
        .bind(order.code)
        .bind(order.customer_id)
        .bind(order.address_id)
        .bind(order.status.to_string())
        .bind(order.total)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(database_error)?;
        let stored = order_from_row(&row)?;

        let mut lines = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let row = sqlx::query(
                "INSERT INTO order_details (order_id, product_id, quantity, unit_price) VALUES ($1, $2, $3, $4) RETURNING id, order_id, product_id, quantity, unit_price",
            )
            .bind(stored.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .fetch_one(&mut *tx)
            .await
            .map_err(database_error)?;
            lines.push(line_from_row(&row)?);
        }

        tx.commit().await.map_err(database_error)?;

        debug!(order_id = stored.id, "Order created in database");
        Ok(OrderWithLines {
            order: stored,
            lines,
        })
    }

    #[instrument(skip(self))]
    async fn list_for_customer(&self, customer_id: i32) -> Result<Vec<OrderModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, code, customer_id, address_id, status, total, created_at FROM orders WHERE customer_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(order_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn lines_for_order(&self, order_id: i32) -> Result<Vec<OrderLineModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, order_id, product_id, quantity, unit_price FROM order_details WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(line_from_row).collect()
    }
}
