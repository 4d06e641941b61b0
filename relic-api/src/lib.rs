//! RELIC API - REST API Layer
//!
//! Axum HTTP surface for the RELIC artifact archive: creator and artifact
//! CRUD, filtered listing, streaming bulk import and CSV reports.
//!
//! Storage is reached only through the `RelicStore` trait. `DbClient`
//! implements it on PostgreSQL; the in-memory store from `relic-storage`
//! backs tests and `RELIC_STORE=memory` runs.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod import;
pub mod macros;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{resolve_bind_addr, ApiConfig, StoreBackend};
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorBody, ErrorCode};
pub use import::ArtifactImporter;
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::{ArtifactService, CreatorService};
pub use state::AppState;
pub use types::*;
