use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::service::SessionService;
use crate::shared::{AppError, AppState};

/// Session middleware - looks the raw Authorization header up in the session
/// store and adds the decoded SessionClaims to the request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), session::require_session))
/// Handlers can then extract Extension(claims): Extension<SessionClaims>.
#[instrument(skip(state, req, next))]
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    info!("Session middleware triggered for request {}", req.uri());

    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .map(str::to_owned);

    if authorization.is_none() {
        warn!("Missing Authorization header in request");
    }

    let service = SessionService::new(
        state.token_config.clone(),
        Arc::clone(&state.session_store),
    );
    let claims = service.validate_session(authorization.as_deref()).await?;

    info!(
        customer_id = claims.customer_id,
        "Authentication successful, adding claims to request"
    );

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
