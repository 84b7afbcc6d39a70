use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::CustomerService,
    types::{CustomerInfoUpdate, LoginOutcome, LoginRequest, UpdateInfoOutcome, UpdatedCustomer},
};
use crate::session::service::SessionService;
use crate::shared::{ApiResponse, AppError, AppState};
use crate::validation::json_payload;

fn customer_service(state: &AppState) -> CustomerService {
    let sessions = SessionService::new(
        state.token_config.clone(),
        Arc::clone(&state.session_store),
    );
    CustomerService::new(Arc::clone(&state.customer_repository), sessions)
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// HTTP handler for customer login
///
/// POST /api/v1/customers/login
/// Returns the access token and profile, or a soft failure on bad credentials
#[instrument(name = "login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_payload(payload)?;
    let outcome = customer_service(&state).login(request).await?;

    let response = match outcome {
        LoginOutcome::Authenticated(body) => {
            info!(customer_id = body.user.customer_id, "Login succeeded");
            Json(ApiResponse::ok("Authenticated successfully", body)).into_response()
        }
        LoginOutcome::InvalidCredentials => {
            Json(ApiResponse::soft_failure("Invalid username/password")).into_response()
        }
    };

    Ok(response)
}

/// HTTP handler for customer logout
///
/// POST /api/v1/customers/logout
#[instrument(name = "logout", skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, AppError> {
    customer_service(&state)
        .logout(authorization(&headers))
        .await?;

    Ok(Json(ApiResponse::success("Logged out successfuly")))
}

/// HTTP handler for updating the logged in customer's profile
///
/// POST /api/v1/customers/update-info
#[instrument(name = "update_info", skip_all)]
pub async fn update_info(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CustomerInfoUpdate>, JsonRejection>,
) -> Result<Response, AppError> {
    let update = json_payload(payload)?;
    let outcome = customer_service(&state)
        .update_info(authorization(&headers), update)
        .await?;

    let response = match outcome {
        UpdateInfoOutcome::Updated { customer_id } => Json(ApiResponse::ok(
            "Update info successfuly",
            UpdatedCustomer { customer_id },
        ))
        .into_response(),
        UpdateInfoOutcome::NotUpdated => {
            Json(ApiResponse::soft_failure("Update info failed")).into_response()
        }
        UpdateInfoOutcome::CustomerMissing => {
            Json(ApiResponse::soft_failure("CustomerId does not exist")).into_response()
        }
    };

    Ok(response)
}
