use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::{address, customer, order, product, session};

/// Builds the full HTTP application around the given state
pub fn router(state: AppState) -> Router {
    let require_session = middleware::from_fn_with_state(state.clone(), session::require_session);

    let customers = Router::new()
        .route("/login", post(customer::login))
        .route("/logout", post(customer::logout))
        .route("/update-info", post(customer::update_info));

    let products = Router::new()
        .route("/", get(product::list_products))
        .route("/latest", get(product::latest_products))
        .route(
            "/:id",
            get(product::product_detail).merge(
                put(product::update_product).route_layer(require_session.clone()),
            ),
        );

    let orders = Router::new()
        .route("/", get(order::list_orders).post(order::place_order))
        .route_layer(require_session);

    let api = Router::new()
        .nest("/customers", customers)
        .nest("/products", products)
        .nest("/orders", orders)
        .route("/addresses", get(address::list_addresses));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
