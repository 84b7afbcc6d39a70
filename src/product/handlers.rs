use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::ProductModel,
    service::ProductService,
    types::{ProductPage, ProductQuery, ProductUpdate},
};
use crate::shared::{ApiResponse, AppError, AppState};
use crate::validation::json_payload;

fn product_service(state: &AppState) -> ProductService {
    ProductService::new(Arc::clone(&state.product_repository))
}

/// GET /api/v1/products/latest
#[instrument(name = "latest_products", skip(state))]
pub async fn latest_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductModel>>>, AppError> {
    let products = product_service(&state).latest().await?;
    info!(count = products.len(), "Latest products listed");
    Ok(Json(ApiResponse::ok("OK", products)))
}

/// GET /api/v1/products?search=&perPage=&currentPage=
#[instrument(name = "list_products", skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<ProductPage>>, AppError> {
    let page = product_service(&state).list(query).await?;
    info!(total = page.total, "Products listed");
    Ok(Json(ApiResponse::ok("OK", page)))
}

/// GET /api/v1/products/{id}
#[instrument(name = "product_detail", skip(state))]
pub async fn product_detail(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<ApiResponse<ProductModel>>, AppError> {
    let product = product_service(&state).detail(product_id).await?;
    Ok(Json(ApiResponse::ok("OK", product)))
}

/// PUT /api/v1/products/{id} (session required)
#[instrument(name = "update_product", skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Response, AppError> {
    let update = json_payload(payload)?;
    let updated = product_service(&state).update(product_id, update).await?;

    let response = if updated {
        Json(ApiResponse::success("Update product successfuly")).into_response()
    } else {
        Json(ApiResponse::soft_failure("Update product failed")).into_response()
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::repository::{tests::create_test_products, InMemoryProductRepository};
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt; // for `oneshot`

    fn app(count: i32) -> Router {
        let state = AppStateBuilder::new()
            .with_product_repository(Arc::new(InMemoryProductRepository::with_products(
                create_test_products(count),
            )))
            .build();

        Router::new()
            .route("/products", get(list_products))
            .route("/products/latest", get(latest_products))
            .route("/products/:id", get(product_detail).put(update_product))
            .with_state(state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_list_products_handler_with_query() {
        let (status, body) = get_json(app(30), "/products?perPage=5&currentPage=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 30);
        assert_eq!(body["data"]["perPage"], 5);
        assert_eq!(body["data"]["products"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"]["products"][0]["id"], 6);
    }

    #[tokio::test]
    async fn test_list_products_handler_rejects_bad_paging() {
        let (status, body) = get_json(app(3), "/products?perPage=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_list_products_handler_last_representable_page() {
        let (status, body) = get_json(
            app(3),
            "/products?perPage=100&currentPage=9223372036854775807",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 3);
        assert!(body["data"]["products"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_products_handler() {
        let (status, body) = get_json(app(3), "/products/latest").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], 3);
    }

    #[tokio::test]
    async fn test_product_detail_handler() {
        let (status, body) = get_json(app(3), "/products/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Product 2");
        assert_eq!(body["data"]["price"], 20_000);

        let (status, body) = get_json(app(3), "/products/9").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_update_product_handler_wrong_type_is_bad_request() {
        let request = Request::builder()
            .method("PUT")
            .uri("/products/1")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"X","price":"cheap","quantity":1}"#))
            .unwrap();

        let response = app(3).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"].as_array().unwrap().len(), 1);
    }
}
