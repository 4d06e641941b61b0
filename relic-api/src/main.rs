//! RELIC API Server Entry Point
//!
//! Bootstraps configuration, selects the store and starts the Axum HTTP
//! server.

use std::sync::Arc;

use axum::Router;
use relic_api::telemetry::{init_tracer, TelemetryConfig};
use relic_api::{
    create_api_router, resolve_bind_addr, ApiConfig, ApiError, ApiResult, AppState, DbClient,
    DbConfig, StoreBackend,
};
use relic_storage::{InMemoryStore, RelicStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracer(&TelemetryConfig::default())?;

    let api_config = ApiConfig::from_env();
    let store = open_store(api_config.store).await?;

    let state = AppState::new(store, api_config);
    let app: Router = create_api_router(state);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting RELIC API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

async fn open_store(backend: StoreBackend) -> ApiResult<Arc<dyn RelicStore>> {
    match backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let db_config = DbConfig::from_env();
            tracing::info!(
                host = %db_config.host,
                port = db_config.port,
                dbname = %db_config.dbname,
                "Connecting to PostgreSQL"
            );
            let db = DbClient::from_config(&db_config)?;
            db.init_schema().await?;
            Ok(Arc::new(db))
        }
    }
}
