//! In-memory store.
//!
//! Both tables live behind one lock, so the uniqueness and reference checks
//! happen in the same critical section as the write they guard.

use crate::store::{RelicStore, StorageResult, StorageStatistics};
use ::async_trait::async_trait;
use relic_core::{
    Artifact, ArtifactDraft, ArtifactFilter, ArtifactId, Creator, CreatorDraft, CreatorId,
    EntityKind, Page, PageRequest, StorageError,
};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    creators: BTreeMap<CreatorId, Creator>,
    artifacts: BTreeMap<ArtifactId, Artifact>,
    last_creator_id: i64,
    last_artifact_id: i64,
}

impl Tables {
    fn ensure_name_free(&self, name: &str, except: Option<CreatorId>) -> StorageResult<()> {
        let taken = self
            .creators
            .values()
            .any(|c| Some(c.id) != except && c.has_name(name));
        if taken {
            return Err(StorageError::Conflict {
                entity_type: EntityKind::Creator,
                reason: format!("name '{}' is already taken", name),
            });
        }
        Ok(())
    }

    fn ensure_creator_exists(&self, id: CreatorId) -> StorageResult<()> {
        if !self.creators.contains_key(&id) {
            return Err(StorageError::MissingReference {
                entity_type: EntityKind::Creator,
                id: id.0,
            });
        }
        Ok(())
    }

    fn filtered<'a>(&'a self, filter: &'a ArtifactFilter) -> impl Iterator<Item = &'a Artifact> {
        let predicates = filter.predicates();
        self.artifacts
            .values()
            .filter(move |a| predicates.iter().all(|p| p.matches(a)))
    }
}

/// In-memory storage, used by tests and by the server when
/// `RELIC_STORE=memory`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StorageError::LockPoisoned)
    }

    /// Remove every row and restart id assignment.
    pub fn clear(&self) -> StorageResult<()> {
        *self.write()? = Tables::default();
        Ok(())
    }
}

#[async_trait]
impl RelicStore for InMemoryStore {
    async fn creator_insert(&self, draft: &CreatorDraft) -> StorageResult<Creator> {
        let mut tables = self.write()?;
        tables.ensure_name_free(draft.name(), None)?;

        tables.last_creator_id += 1;
        let creator = Creator::from_draft(CreatorId(tables.last_creator_id), draft.clone());
        tables.creators.insert(creator.id, creator.clone());
        Ok(creator)
    }

    async fn creator_get(&self, id: CreatorId) -> StorageResult<Option<Creator>> {
        Ok(self.read()?.creators.get(&id).cloned())
    }

    async fn creators_by_ids(&self, ids: &[CreatorId]) -> StorageResult<Vec<Creator>> {
        let tables = self.read()?;
        let mut found: Vec<Creator> = ids
            .iter()
            .filter_map(|id| tables.creators.get(id).cloned())
            .collect();
        found.sort_by_key(|c| c.id);
        found.dedup_by_key(|c| c.id);
        Ok(found)
    }

    async fn creator_list(&self) -> StorageResult<Vec<Creator>> {
        Ok(self.read()?.creators.values().cloned().collect())
    }

    async fn creator_update(&self, id: CreatorId, draft: &CreatorDraft) -> StorageResult<Creator> {
        let mut tables = self.write()?;
        if !tables.creators.contains_key(&id) {
            return Err(StorageError::NotFound {
                entity_type: EntityKind::Creator,
                id: id.0,
            });
        }
        tables.ensure_name_free(draft.name(), Some(id))?;

        let creator = Creator::from_draft(id, draft.clone());
        tables.creators.insert(id, creator.clone());
        Ok(creator)
    }

    async fn creator_delete(&self, id: CreatorId) -> StorageResult<()> {
        let mut tables = self.write()?;
        if !tables.creators.contains_key(&id) {
            return Err(StorageError::NotFound {
                entity_type: EntityKind::Creator,
                id: id.0,
            });
        }
        let referenced = tables.artifacts.values().filter(|a| a.creator_id == id).count();
        if referenced > 0 {
            return Err(StorageError::Conflict {
                entity_type: EntityKind::Creator,
                reason: format!("creator {} is still referenced by {} artifact(s)", id, referenced),
            });
        }
        tables.creators.remove(&id);
        Ok(())
    }

    async fn artifact_insert(&self, draft: &ArtifactDraft) -> StorageResult<Artifact> {
        let mut tables = self.write()?;
        tables.ensure_creator_exists(draft.creator_id())?;

        tables.last_artifact_id += 1;
        let artifact = Artifact::from_draft(ArtifactId(tables.last_artifact_id), draft.clone());
        tables.artifacts.insert(artifact.id, artifact.clone());
        Ok(artifact)
    }

    async fn artifact_get(&self, id: ArtifactId) -> StorageResult<Option<Artifact>> {
        Ok(self.read()?.artifacts.get(&id).cloned())
    }

    async fn artifact_update(
        &self,
        id: ArtifactId,
        draft: &ArtifactDraft,
    ) -> StorageResult<Artifact> {
        let mut tables = self.write()?;
        if !tables.artifacts.contains_key(&id) {
            return Err(StorageError::NotFound {
                entity_type: EntityKind::Artifact,
                id: id.0,
            });
        }
        tables.ensure_creator_exists(draft.creator_id())?;

        let artifact = Artifact::from_draft(id, draft.clone());
        tables.artifacts.insert(id, artifact.clone());
        Ok(artifact)
    }

    async fn artifact_delete(&self, id: ArtifactId) -> StorageResult<()> {
        let mut tables = self.write()?;
        match tables.artifacts.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound {
                entity_type: EntityKind::Artifact,
                id: id.0,
            }),
        }
    }

    async fn artifact_page(
        &self,
        filter: &ArtifactFilter,
        page: PageRequest,
    ) -> StorageResult<Page<Artifact>> {
        let tables = self.read()?;
        let matching: Vec<&Artifact> = tables.filtered(filter).collect();
        Ok(page.paginate(&matching).map(Artifact::clone))
    }

    async fn artifact_query(&self, filter: &ArtifactFilter) -> StorageResult<Vec<Artifact>> {
        let tables = self.read()?;
        Ok(tables.filtered(filter).cloned().collect())
    }

    async fn ping(&self) -> StorageResult<()> {
        self.read().map(|_| ())
    }

    async fn statistics(&self) -> StorageResult<StorageStatistics> {
        let tables = self.read()?;
        Ok(StorageStatistics {
            creator_count: tables.creators.len() as u64,
            artifact_count: tables.artifacts.len() as u64,
        })
    }
}
