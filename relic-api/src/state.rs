//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use relic_storage::RelicStore;

use crate::config::ApiConfig;
use crate::services::{ArtifactService, CreatorService};

/// Application-wide state shared across all routes.
///
/// The store is the only mutable resource; everything else is read-only
/// configuration.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RelicStore>,
    pub config: Arc<ApiConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn RelicStore>, config: ApiConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn artifact_service(&self) -> ArtifactService {
        ArtifactService::new(self.store.clone(), self.config.clone())
    }

    pub fn creator_service(&self) -> CreatorService {
        CreatorService::new(self.store.clone())
    }
}

crate::impl_from_ref!(Arc<dyn RelicStore>, store);
crate::impl_from_ref!(Arc<ApiConfig>, config);
crate::impl_from_ref!(Instant, start_time);
