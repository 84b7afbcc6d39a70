use axum::Router;
use chrono::{Duration, Utc};
use std::sync::Arc;

use storefront::{
    address::{models::AddressModel, repository::InMemoryAddressRepository},
    customer::{
        models::CustomerModel, password::PasswordHasher, repository::InMemoryCustomerRepository,
    },
    order::repository::InMemoryOrderRepository,
    product::{models::ProductModel, repository::InMemoryProductRepository},
    session::store::InMemorySessionStore,
    AppState, TokenConfig,
};

pub const TEST_SECRET: &str = "integration-test-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

#[allow(dead_code)]
pub struct TestSetup {
    pub app: Router,
    pub token_config: TokenConfig,
    pub session_store: Arc<InMemorySessionStore>,
    pub order_repository: Arc<InMemoryOrderRepository>,
    pub product_repository: Arc<InMemoryProductRepository>,
}

pub struct TestSetupBuilder {
    customers: Vec<(i32, String, String)>,
    product_count: i32,
    addresses: Vec<AddressModel>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            customers: vec![],
            product_count: 0,
            addresses: vec![],
        }
    }

    pub fn with_customer(mut self, id: i32, username: &str, password: &str) -> Self {
        self.customers
            .push((id, username.to_string(), password.to_string()));
        self
    }

    /// Seeds alice (password "correct") and bob (password "hunter22")
    pub fn with_default_customers(self) -> Self {
        self.with_customer(1, "alice", "correct")
            .with_customer(2, "bob", "hunter22")
    }

    /// Seeds products 1..=count; product N costs N * 10_000 and newer ids are more recent
    pub fn with_products(mut self, count: i32) -> Self {
        self.product_count = count;
        self
    }

    pub fn with_default_addresses(mut self) -> Self {
        self.addresses = vec![
            AddressModel {
                id: 1,
                city: "Ho Chi Minh".to_string(),
                district: "District 1".to_string(),
                detail: "12 Nguyen Hue".to_string(),
            },
            AddressModel {
                id: 2,
                city: "Ha Noi".to_string(),
                district: "Hoan Kiem".to_string(),
                detail: "3 Trang Tien".to_string(),
            },
        ];
        self
    }

    pub fn build(self) -> TestSetup {
        let hasher = PasswordHasher::new();
        let customers = self
            .customers
            .iter()
            .map(|(id, username, password)| CustomerModel {
                id: *id,
                username: username.clone(),
                password_hash: hasher.hash_password(password).unwrap(),
                full_name: format!("{} tester", username),
                email: format!("{}@example.com", username),
                phone: "0900000000".to_string(),
                address: "1 Test Street".to_string(),
            })
            .collect();

        let now = Utc::now();
        let products = (1..=self.product_count)
            .map(|id| ProductModel {
                id,
                name: format!("Product {}", id),
                description: format!("Description of product {}", id),
                price: 10_000 * id as i64,
                quantity: 50,
                image_url: None,
                created_at: now - Duration::minutes((self.product_count - id) as i64),
            })
            .collect();

        let token_config = TokenConfig::new(TEST_SECRET, 24);
        let session_store = Arc::new(InMemorySessionStore::new());
        let order_repository = Arc::new(InMemoryOrderRepository::new());
        let product_repository = Arc::new(InMemoryProductRepository::with_products(products));

        let state = AppState::new(
            token_config.clone(),
            session_store.clone(),
            Arc::new(InMemoryCustomerRepository::with_customers(customers)),
            product_repository.clone(),
            Arc::new(InMemoryAddressRepository::with_addresses(self.addresses)),
            order_repository.clone(),
        );

        TestSetup {
            app: storefront::router(state),
            token_config,
            session_store,
            order_repository,
            product_repository,
        }
    }
}
