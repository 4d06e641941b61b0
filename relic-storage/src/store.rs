//! Async storage trait for creators and artifacts.
//!
//! Every implementation must uphold the two relational rules itself, without
//! relying on callers having checked first:
//!
//! - creator names are unique ignoring case, and
//! - an artifact always references an existing creator (inserts and updates
//!   with a dangling `creator_id` fail with `MissingReference`, deleting a
//!   referenced creator fails with `Conflict`).
//!
//! Listing operations return rows ordered by ascending id.

use ::async_trait::async_trait;
use relic_core::{
    Artifact, ArtifactDraft, ArtifactFilter, ArtifactId, Creator, CreatorDraft, CreatorId, Page,
    PageRequest, StorageError,
};

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait RelicStore: Send + Sync {
    // ========================================================================
    // CREATOR OPERATIONS
    // ========================================================================

    /// Insert a new creator and return it with its assigned id.
    async fn creator_insert(&self, draft: &CreatorDraft) -> StorageResult<Creator>;

    /// Get a creator by ID.
    async fn creator_get(&self, id: CreatorId) -> StorageResult<Option<Creator>>;

    /// Fetch every existing creator among `ids`. Unknown ids are skipped.
    async fn creators_by_ids(&self, ids: &[CreatorId]) -> StorageResult<Vec<Creator>>;

    /// List all creators.
    async fn creator_list(&self) -> StorageResult<Vec<Creator>>;

    /// Replace every mutable field of a creator.
    async fn creator_update(&self, id: CreatorId, draft: &CreatorDraft) -> StorageResult<Creator>;

    /// Delete a creator that no artifact references.
    async fn creator_delete(&self, id: CreatorId) -> StorageResult<()>;

    // ========================================================================
    // ARTIFACT OPERATIONS
    // ========================================================================

    /// Insert a new artifact and return it with its assigned id.
    async fn artifact_insert(&self, draft: &ArtifactDraft) -> StorageResult<Artifact>;

    /// Get an artifact by ID.
    async fn artifact_get(&self, id: ArtifactId) -> StorageResult<Option<Artifact>>;

    /// Replace every mutable field of an artifact.
    async fn artifact_update(
        &self,
        id: ArtifactId,
        draft: &ArtifactDraft,
    ) -> StorageResult<Artifact>;

    /// Delete an artifact.
    async fn artifact_delete(&self, id: ArtifactId) -> StorageResult<()>;

    /// One page of the filtered artifacts plus the filtered totals.
    async fn artifact_page(
        &self,
        filter: &ArtifactFilter,
        page: PageRequest,
    ) -> StorageResult<Page<Artifact>>;

    /// Every artifact matching the filter, unpaginated.
    async fn artifact_query(&self, filter: &ArtifactFilter) -> StorageResult<Vec<Artifact>>;

    // ========================================================================
    // HEALTH & DIAGNOSTICS
    // ========================================================================

    /// Check the backend is reachable.
    async fn ping(&self) -> StorageResult<()>;

    /// Row counts.
    async fn statistics(&self) -> StorageResult<StorageStatistics>;
}

/// Storage statistics for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStatistics {
    pub creator_count: u64,
    pub artifact_count: u64,
}
