use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::models::AddressModel;
use crate::shared::{ApiResponse, AppError, AppState};

/// HTTP handler for listing delivery addresses
///
/// GET /api/v1/addresses
#[instrument(name = "list_addresses", skip(state))]
pub async fn list_addresses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AddressModel>>>, AppError> {
    let addresses = state.address_repository.list_addresses().await?;
    info!(count = addresses.len(), "Addresses listed");
    Ok(Json(ApiResponse::ok("OK", addresses)))
}
