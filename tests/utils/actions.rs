use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use super::setup::TestSetup;

/// Status and decoded JSON body of a routed request
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn success(&self) -> bool {
        self.body["success"].as_bool().unwrap_or(false)
    }

    pub fn message(&self) -> &Value {
        &self.body["message"]
    }
}

// ============================================================================
// Request Actions
// ============================================================================

impl TestSetup {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/api/v1/customers/login",
            Some(serde_json::json!({ "username": username, "password": password })),
            None,
        )
        .await
    }

    /// Logs in and returns the `Authorization` header value for the new session
    pub async fn login_as(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert!(response.success(), "login failed: {}", response.body);
        let token = response.body["data"]["accessToken"].as_str().unwrap();
        format!("Bearer {}", token)
    }

    pub async fn logout(&self, authorization: Option<&str>) -> TestResponse {
        self.send("POST", "/api/v1/customers/logout", None, authorization)
            .await
    }

    pub async fn update_info(&self, body: Value, authorization: Option<&str>) -> TestResponse {
        self.send(
            "POST",
            "/api/v1/customers/update-info",
            Some(body),
            authorization,
        )
        .await
    }

    pub async fn place_order(&self, body: Value, authorization: Option<&str>) -> TestResponse {
        self.send("POST", "/api/v1/orders", Some(body), authorization)
            .await
    }

    pub async fn list_orders(&self, authorization: Option<&str>) -> TestResponse {
        self.send("GET", "/api/v1/orders", None, authorization).await
    }
}
