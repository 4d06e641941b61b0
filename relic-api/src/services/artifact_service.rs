//! Artifact Service
//!
//! Artifacts only carry their creator's id. Every read joins the creator
//! rows in with a single `creators_by_ids` call per page or report.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::extract::FromRef;
use futures_util::Stream;
use relic_core::{
    render_artifact_report, Artifact, ArtifactId, Creator, CreatorId, EntityKind, ReportRow,
};
use relic_storage::RelicStore;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::import::ArtifactImporter;
use crate::state::AppState;
use crate::types::{
    ArtifactDetailsResponse, ArtifactListRequest, ArtifactListResponse, ArtifactReportRequest,
    ArtifactSaveRequest, ImportSummary,
};

#[derive(Clone)]
pub struct ArtifactService {
    store: Arc<dyn RelicStore>,
    config: Arc<ApiConfig>,
}

impl ArtifactService {
    pub fn new(store: Arc<dyn RelicStore>, config: Arc<ApiConfig>) -> Self {
        Self { store, config }
    }

    pub async fn create(&self, request: ArtifactSaveRequest) -> ApiResult<ArtifactDetailsResponse> {
        let draft = request.into_draft()?;
        let creator = self.require_creator(draft.creator_id()).await?;
        let artifact = self.store.artifact_insert(&draft).await?;
        tracing::debug!(artifact_id = %artifact.id, "Artifact created");
        Ok(ArtifactDetailsResponse::new(artifact, Some(creator)))
    }

    pub async fn get(&self, id: ArtifactId) -> ApiResult<ArtifactDetailsResponse> {
        let artifact = self
            .store
            .artifact_get(id)
            .await?
            .ok_or_else(|| ApiError::entity_not_found(EntityKind::Artifact.as_str(), id))?;
        let creator = self.store.creator_get(artifact.creator_id).await?;
        Ok(ArtifactDetailsResponse::new(artifact, creator))
    }

    /// One page of the filtered set, ascending by id.
    pub async fn list(&self, request: ArtifactListRequest) -> ApiResult<ArtifactListResponse> {
        let page_request = request.page_request(self.config.default_page_size)?;
        let filter = request.filter.to_filter();

        let page = self.store.artifact_page(&filter, page_request).await?;
        let creators = self.creators_for(&page.items).await?;

        let list = page
            .items
            .into_iter()
            .map(|artifact| {
                let creator = creators.get(&artifact.creator_id).cloned();
                ArtifactDetailsResponse::new(artifact, creator)
            })
            .collect();

        Ok(ArtifactListResponse {
            list,
            total_pages: page.total_pages,
        })
    }

    /// Replace every mutable field of an existing artifact.
    pub async fn update(
        &self,
        id: ArtifactId,
        request: ArtifactSaveRequest,
    ) -> ApiResult<ArtifactDetailsResponse> {
        let draft = request.into_draft()?;
        let creator = self.require_creator(draft.creator_id()).await?;
        let artifact = self.store.artifact_update(id, &draft).await?;
        Ok(ArtifactDetailsResponse::new(artifact, Some(creator)))
    }

    pub async fn delete(&self, id: ArtifactId) -> ApiResult<()> {
        self.store.artifact_delete(id).await?;
        tracing::debug!(artifact_id = %id, "Artifact deleted");
        Ok(())
    }

    /// Import a JSON array of artifact records from a chunked body. Each
    /// record goes through [`Self::create`].
    pub async fn import<S, B, E>(&self, chunks: S) -> ApiResult<ImportSummary>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<ApiError>,
    {
        ArtifactImporter::new(self.config.max_record_bytes)
            .run(chunks, |request| self.create(request))
            .await
    }

    /// CSV report over the whole filtered set, ascending by id.
    pub async fn report(&self, request: &ArtifactReportRequest) -> ApiResult<Vec<u8>> {
        let filter = request.to_filter();
        let artifacts = self.store.artifact_query(&filter).await?;
        let creators = self.creators_for(&artifacts).await?;

        let rows = artifacts
            .iter()
            .map(|artifact| ReportRow::new(artifact, creators.get(&artifact.creator_id)));
        let csv = render_artifact_report(rows)?;

        tracing::debug!(rows = artifacts.len(), bytes = csv.len(), "Artifact report rendered");
        Ok(csv)
    }

    async fn require_creator(&self, id: CreatorId) -> ApiResult<Creator> {
        self.store
            .creator_get(id)
            .await?
            .ok_or_else(|| ApiError::entity_not_found(EntityKind::Creator.as_str(), id))
    }

    async fn creators_for(&self, artifacts: &[Artifact]) -> ApiResult<HashMap<CreatorId, Creator>> {
        let ids: BTreeSet<CreatorId> = artifacts.iter().map(|a| a.creator_id).collect();
        let ids: Vec<CreatorId> = ids.into_iter().collect();
        let creators = self.store.creators_by_ids(&ids).await?;
        Ok(creators.into_iter().map(|c| (c.id, c)).collect())
    }
}

impl FromRef<AppState> for ArtifactService {
    fn from_ref(state: &AppState) -> Self {
        state.artifact_service()
    }
}
