//! Creator Service
//!
//! Name uniqueness is left to the store, which enforces it atomically.

use std::sync::Arc;

use axum::extract::FromRef;
use relic_core::{CreatorId, EntityKind};
use relic_storage::RelicStore;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{CreatorResponse, CreatorSaveRequest};

#[derive(Clone)]
pub struct CreatorService {
    store: Arc<dyn RelicStore>,
}

impl CreatorService {
    pub fn new(store: Arc<dyn RelicStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: CreatorSaveRequest) -> ApiResult<CreatorResponse> {
        let draft = request.into_draft()?;
        let creator = self.store.creator_insert(&draft).await?;
        tracing::debug!(creator_id = %creator.id, "Creator created");
        Ok(creator.into())
    }

    pub async fn get(&self, id: CreatorId) -> ApiResult<CreatorResponse> {
        self.store
            .creator_get(id)
            .await?
            .map(CreatorResponse::from)
            .ok_or_else(|| ApiError::entity_not_found(EntityKind::Creator.as_str(), id))
    }

    pub async fn list_all(&self) -> ApiResult<Vec<CreatorResponse>> {
        let creators = self.store.creator_list().await?;
        Ok(creators.into_iter().map(CreatorResponse::from).collect())
    }

    /// Replace every field of an existing creator.
    pub async fn update(
        &self,
        id: CreatorId,
        request: CreatorSaveRequest,
    ) -> ApiResult<CreatorResponse> {
        let draft = request.into_draft()?;
        let creator = self.store.creator_update(id, &draft).await?;
        Ok(creator.into())
    }

    /// Fails with 409 while any artifact still references the creator.
    pub async fn delete(&self, id: CreatorId) -> ApiResult<()> {
        self.store.creator_delete(id).await?;
        tracing::debug!(creator_id = %id, "Creator deleted");
        Ok(())
    }
}

impl FromRef<AppState> for CreatorService {
    fn from_ref(state: &AppState) -> Self {
        state.creator_service()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use relic_storage::InMemoryStore;

    fn service() -> CreatorService {
        CreatorService::new(Arc::new(InMemoryStore::new()))
    }

    fn request(name: &str) -> CreatorSaveRequest {
        CreatorSaveRequest {
            name: Some(name.to_string()),
            race: Some("Maia".to_string()),
            realm: Some("Mordor".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();
        let created = service.create(request("Sauron")).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_duplicate_name_ignoring_case() {
        let service = service();
        service.create(request("Sauron")).await.unwrap();
        let err = service.create(request("sauron")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StateConflict);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let service = service();
        let err = service.update(CreatorId(9), request("Telchar")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EntityNotFound);

        let err = service.delete(CreatorId(9)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EntityNotFound);
    }

    #[tokio::test]
    async fn test_rename_to_own_case_variant() {
        let service = service();
        let created = service.create(request("Sauron")).await.unwrap();
        let renamed = service.update(created.id, request("SAURON")).await.unwrap();
        assert_eq!(renamed.name, "SAURON");
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }
}
