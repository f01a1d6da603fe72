//! Apartments API server: loads config from the environment, connects the store,
//! ensures the schema, and serves the apartment and operational routes.

use apartments_api::{
    app, ensure_database_exists, shutdown_signal, ApartmentService, ApartmentStore, AppState,
    MemoryApartmentStore, PgApartmentStore, ServerConfig, StoreBackend,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("apartments_api=info,apartments_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let store: Arc<dyn ApartmentStore> = match config.store {
        StoreBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            let store = PgApartmentStore::new(pool);
            store.ensure_schema().await?;
            tracing::info!("connected to PostgreSQL");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryApartmentStore::new())
        }
    };

    let state = AppState::new(ApartmentService::new(store));
    let router = app(state, &config);

    let listener = TcpListener::bind(config.socket_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
