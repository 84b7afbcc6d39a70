use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use storefront::{
    address::repository::{InMemoryAddressRepository, PostgresAddressRepository},
    customer::repository::{InMemoryCustomerRepository, PostgresCustomerRepository},
    order::repository::{InMemoryOrderRepository, PostgresOrderRepository},
    product::repository::{InMemoryProductRepository, PostgresProductRepository},
    session::{
        redis_store::RedisSessionStore,
        start_session_purge_task,
        store::{InMemorySessionStore, SessionStore},
        DEFAULT_PURGE_INTERVAL,
    },
    AppConfig, AppState, TokenConfig,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storefront API server");

    let config = AppConfig::from_env()?;

    let session_store: Arc<dyn SessionStore + Send + Sync> = match &config.redis_url {
        Some(url) => Arc::new(RedisSessionStore::connect(url).await?),
        None => {
            warn!("REDIS_URL not set, sessions are kept in memory");
            let store = Arc::new(InMemorySessionStore::new());
            tokio::spawn(start_session_purge_task(
                store.clone(),
                DEFAULT_PURGE_INTERVAL,
            ));
            store
        }
    };

    let app_state = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
            info!("Connected to PostgreSQL");

            AppState::new(
                TokenConfig::from_config(&config),
                session_store,
                Arc::new(PostgresCustomerRepository::new(pool.clone())),
                Arc::new(PostgresProductRepository::new(pool.clone())),
                Arc::new(PostgresAddressRepository::new(pool.clone())),
                Arc::new(PostgresOrderRepository::new(pool)),
            )
        }
        None => {
            warn!("DATABASE_URL not set, using empty in-memory repositories");

            AppState::new(
                TokenConfig::from_config(&config),
                session_store,
                Arc::new(InMemoryCustomerRepository::new()),
                Arc::new(InMemoryProductRepository::new()),
                Arc::new(InMemoryAddressRepository::new()),
                Arc::new(InMemoryOrderRepository::new()),
            )
        }
    };

    let app = storefront::router(app_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
