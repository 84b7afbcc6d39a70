use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{models::OrderWithLines, service::OrderService, types::PlaceOrderRequest};
use crate::session::SessionClaims;
use crate::shared::{ApiResponse, AppError, AppState};
use crate::validation::json_payload;

fn order_service(state: &AppState) -> OrderService {
    OrderService::new(
        Arc::clone(&state.order_repository),
        Arc::clone(&state.product_repository),
        Arc::clone(&state.address_repository),
    )
}

/// HTTP handler for placing an order as the logged in customer
///
/// POST /api/v1/orders (session required)
#[instrument(name = "place_order", skip_all, fields(customer_id = claims.customer_id))]
pub async fn place_order(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<OrderWithLines>>, AppError> {
    let request = json_payload(payload)?;
    let placed = order_service(&state)
        .place_order(claims.customer_id, request)
        .await?;

    Ok(Json(ApiResponse::ok("Order placed successfuly", placed)))
}

/// GET /api/v1/orders (session required)
#[instrument(name = "list_orders", skip_all, fields(customer_id = claims.customer_id))]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<ApiResponse<Vec<OrderWithLines>>>, AppError> {
    let orders = order_service(&state)
        .list_orders(claims.customer_id)
        .await?;

    info!(count = orders.len(), "Orders listed");
    Ok(Json(ApiResponse::ok("OK", orders)))
}
