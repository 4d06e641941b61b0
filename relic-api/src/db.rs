//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres, and the
//! `RelicStore` implementation on top of it. All statements are
//! parameterized; filter predicates are rendered to a `WHERE` clause with
//! numbered placeholders.
//!
//! The relational rules are enforced by the schema: a unique index on
//! `lower(name)` for creators and an `ON DELETE RESTRICT` foreign key from
//! artifacts. Constraint violations are mapped back to `StorageError`.

use ::async_trait::async_trait;
use deadpool_postgres::{
    Config, ManagerConfig, Pool, PoolConfig, PoolError, RecyclingMethod, Runtime, Timeouts,
};
use relic_core::{
    Artifact, ArtifactDraft, ArtifactFilter, ArtifactId, Bound, Creator, CreatorDraft, CreatorId,
    EntityKind, Page, PageRequest, Predicate, StorageError,
};
use relic_storage::{RelicStore, StorageResult, StorageStatistics};
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

use crate::error::{ApiError, ApiResult};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection acquisition timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "relic".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("RELIC_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("RELIC_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("RELIC_DB_NAME").unwrap_or_else(|_| "relic".to_string()),
            user: std::env::var("RELIC_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("RELIC_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("RELIC_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("RELIC_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig {
            max_size: self.max_size,
            timeouts: Timeouts {
                wait: Some(self.timeout),
                create: Some(self.timeout),
                recycle: Some(self.timeout),
            },
            ..PoolConfig::default()
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS creator (
    id      BIGSERIAL PRIMARY KEY,
    name    VARCHAR(255) NOT NULL,
    race    VARCHAR(255),
    realm   VARCHAR(255)
);

CREATE UNIQUE INDEX IF NOT EXISTS creator_name_lower_key ON creator (lower(name));

CREATE TABLE IF NOT EXISTS artifact (
    id            BIGSERIAL PRIMARY KEY,
    name          VARCHAR(255) NOT NULL,
    creator_id    BIGINT NOT NULL REFERENCES creator (id) ON DELETE RESTRICT,
    origin        VARCHAR(255),
    tags          VARCHAR(500),
    year_created  INTEGER CHECK (year_created >= 0),
    power_level   INTEGER CHECK (power_level BETWEEN 0 AND 10000)
);

CREATE INDEX IF NOT EXISTS artifact_creator_id_idx ON artifact (creator_id);
"#;

const CREATOR_COLUMNS: &str = "id, name, race, realm";
const ARTIFACT_COLUMNS: &str = "id, name, creator_id, origin, tags, year_created, power_level";

// ============================================================================
// FILTER RENDERING
// ============================================================================

type SqlParam = Box<dyn ToSql + Sync + Send>;

/// A rendered `WHERE` clause (empty when unfiltered) and its parameters.
pub(crate) struct SqlFilter {
    pub(crate) clause: String,
    pub(crate) params: Vec<SqlParam>,
}

impl SqlFilter {
    fn push(&mut self, param: SqlParam) -> usize {
        self.params.push(param);
        self.params.len()
    }

    fn param_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

fn render_bound(column: &str, bound: Bound, sql: &mut SqlFilter) -> String {
    match bound {
        Bound::AtLeast(from) => {
            let n = sql.push(Box::new(from));
            format!("{} >= ${}", column, n)
        }
        Bound::AtMost(to) => {
            let n = sql.push(Box::new(to));
            format!("{} <= ${}", column, n)
        }
        Bound::Between(from, to) => {
            let a = sql.push(Box::new(from));
            let b = sql.push(Box::new(to));
            format!("{} BETWEEN ${} AND ${}", column, a, b)
        }
    }
}

/// Render the filter's predicates as a conjunction.
pub(crate) fn render_filter(filter: &ArtifactFilter) -> SqlFilter {
    let mut sql = SqlFilter {
        clause: String::new(),
        params: Vec::new(),
    };
    let mut terms = Vec::new();
    for predicate in filter.predicates() {
        let term = match predicate {
            Predicate::CreatorIs(id) => {
                let n = sql.push(Box::new(id.0));
                format!("creator_id = ${}", n)
            }
            Predicate::OriginIs(origin) => {
                let n = sql.push(Box::new(origin));
                format!("lower(origin) = lower(${})", n)
            }
            Predicate::YearCreated(bound) => render_bound("year_created", bound, &mut sql),
            Predicate::PowerLevel(bound) => render_bound("power_level", bound, &mut sql),
        };
        terms.push(term);
    }
    if !terms.is_empty() {
        sql.clause = format!(" WHERE {}", terms.join(" AND "));
    }
    sql
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn creator_from_row(row: &Row) -> Creator {
    Creator {
        id: CreatorId(row.get("id")),
        name: row.get("name"),
        race: row.get("race"),
        realm: row.get("realm"),
    }
}

fn artifact_from_row(row: &Row) -> Artifact {
    Artifact {
        id: ArtifactId(row.get("id")),
        name: row.get("name"),
        creator_id: CreatorId(row.get("creator_id")),
        origin: row.get("origin"),
        tags: row.get("tags"),
        year_created: row.get("year_created"),
        power_level: row.get("power_level"),
    }
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

fn query_failed(err: tokio_postgres::Error) -> StorageError {
    tracing::error!("Database error: {:?}", err);
    StorageError::QueryFailed {
        reason: err.to_string(),
    }
}

fn has_code(err: &tokio_postgres::Error, code: &SqlState) -> bool {
    err.code() == Some(code)
}

fn creator_name_conflict(err: tokio_postgres::Error, name: &str) -> StorageError {
    if has_code(&err, &SqlState::UNIQUE_VIOLATION) {
        return StorageError::Conflict {
            entity_type: EntityKind::Creator,
            reason: format!("name '{}' is already taken", name),
        };
    }
    query_failed(err)
}

fn missing_creator(err: tokio_postgres::Error, creator_id: CreatorId) -> StorageError {
    if has_code(&err, &SqlState::FOREIGN_KEY_VIOLATION) {
        return StorageError::MissingReference {
            entity_type: EntityKind::Creator,
            id: creator_id.0,
        };
    }
    query_failed(err)
}

fn pool_unavailable(err: PoolError) -> StorageError {
    tracing::error!("Connection pool error: {:?}", err);
    StorageError::Unavailable {
        reason: err.to_string(),
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes that do not exist yet.
    pub async fn init_schema(&self) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.batch_execute(SCHEMA_SQL).await?;
        tracing::info!("Database schema ready");
        Ok(())
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> StorageResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(pool_unavailable)
    }
}

#[async_trait]
impl RelicStore for DbClient {
    // ========================================================================
    // CREATOR OPERATIONS
    // ========================================================================

    async fn creator_insert(&self, draft: &CreatorDraft) -> StorageResult<Creator> {
        let conn = self.get_conn().await?;
        let sql = format!(
            "INSERT INTO creator (name, race, realm) VALUES ($1, $2, $3) RETURNING {}",
            CREATOR_COLUMNS
        );
        let row = conn
            .query_one(sql.as_str(), &[&draft.name(), &draft.race(), &draft.realm()])
            .await
            .map_err(|e| creator_name_conflict(e, draft.name()))?;
        Ok(creator_from_row(&row))
    }

    async fn creator_get(&self, id: CreatorId) -> StorageResult<Option<Creator>> {
        let conn = self.get_conn().await?;
        let sql = format!("SELECT {} FROM creator WHERE id = $1", CREATOR_COLUMNS);
        let row = conn
            .query_opt(sql.as_str(), &[&id.0])
            .await
            .map_err(query_failed)?;
        Ok(row.as_ref().map(creator_from_row))
    }

    async fn creators_by_ids(&self, ids: &[CreatorId]) -> StorageResult<Vec<Creator>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.0).collect();
        let conn = self.get_conn().await?;
        let sql = format!(
            "SELECT {} FROM creator WHERE id = ANY($1) ORDER BY id",
            CREATOR_COLUMNS
        );
        let rows = conn
            .query(sql.as_str(), &[&raw])
            .await
            .map_err(query_failed)?;
        Ok(rows.iter().map(creator_from_row).collect())
    }

    async fn creator_list(&self) -> StorageResult<Vec<Creator>> {
        let conn = self.get_conn().await?;
        let sql = format!("SELECT {} FROM creator ORDER BY id", CREATOR_COLUMNS);
        let rows = conn.query(sql.as_str(), &[]).await.map_err(query_failed)?;
        Ok(rows.iter().map(creator_from_row).collect())
    }

    async fn creator_update(&self, id: CreatorId, draft: &CreatorDraft) -> StorageResult<Creator> {
        let conn = self.get_conn().await?;
        let sql = format!(
            "UPDATE creator SET name = $2, race = $3, realm = $4 WHERE id = $1 RETURNING {}",
            CREATOR_COLUMNS
        );
        let row = conn
            .query_opt(
                sql.as_str(),
                &[&id.0, &draft.name(), &draft.race(), &draft.realm()],
            )
            .await
            .map_err(|e| creator_name_conflict(e, draft.name()))?;
        row.as_ref()
            .map(creator_from_row)
            .ok_or(StorageError::NotFound {
                entity_type: EntityKind::Creator,
                id: id.0,
            })
    }

    async fn creator_delete(&self, id: CreatorId) -> StorageResult<()> {
        let conn = self.get_conn().await?;
        let deleted = conn
            .execute("DELETE FROM creator WHERE id = $1", &[&id.0])
            .await
            .map_err(|e| {
                if has_code(&e, &SqlState::FOREIGN_KEY_VIOLATION) {
                    StorageError::Conflict {
                        entity_type: EntityKind::Creator,
                        reason: format!("creator {} is still referenced by artifacts", id),
                    }
                } else {
                    query_failed(e)
                }
            })?;
        if deleted == 0 {
            return Err(StorageError::NotFound {
                entity_type: EntityKind::Creator,
                id: id.0,
            });
        }
        Ok(())
    }

    // ========================================================================
    // ARTIFACT OPERATIONS
    // ========================================================================

    async fn artifact_insert(&self, draft: &ArtifactDraft) -> StorageResult<Artifact> {
        let conn = self.get_conn().await?;
        let sql = format!(
            "INSERT INTO artifact (name, creator_id, origin, tags, year_created, power_level) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ARTIFACT_COLUMNS
        );
        let row = conn
            .query_one(
                sql.as_str(),
                &[
                    &draft.name(),
                    &draft.creator_id().0,
                    &draft.origin(),
                    &draft.tags(),
                    &draft.year_created(),
                    &draft.power_level(),
                ],
            )
            .await
            .map_err(|e| missing_creator(e, draft.creator_id()))?;
        Ok(artifact_from_row(&row))
    }

    async fn artifact_get(&self, id: ArtifactId) -> StorageResult<Option<Artifact>> {
        let conn = self.get_conn().await?;
        let sql = format!("SELECT {} FROM artifact WHERE id = $1", ARTIFACT_COLUMNS);
        let row = conn
            .query_opt(sql.as_str(), &[&id.0])
            .await
            .map_err(query_failed)?;
        Ok(row.as_ref().map(artifact_from_row))
    }

    async fn artifact_update(
        &self,
        id: ArtifactId,
        draft: &ArtifactDraft,
    ) -> StorageResult<Artifact> {
        let conn = self.get_conn().await?;
        let sql = format!(
            "UPDATE artifact SET name = $2, creator_id = $3, origin = $4, tags = $5, \
             year_created = $6, power_level = $7 WHERE id = $1 RETURNING {}",
            ARTIFACT_COLUMNS
        );
        let row = conn
            .query_opt(
                sql.as_str(),
                &[
                    &id.0,
                    &draft.name(),
                    &draft.creator_id().0,
                    &draft.origin(),
                    &draft.tags(),
                    &draft.year_created(),
                    &draft.power_level(),
                ],
            )
            .await
            .map_err(|e| missing_creator(e, draft.creator_id()))?;
        row.as_ref()
            .map(artifact_from_row)
            .ok_or(StorageError::NotFound {
                entity_type: EntityKind::Artifact,
                id: id.0,
            })
    }

    async fn artifact_delete(&self, id: ArtifactId) -> StorageResult<()> {
        let conn = self.get_conn().await?;
        let deleted = conn
            .execute("DELETE FROM artifact WHERE id = $1", &[&id.0])
            .await
            .map_err(query_failed)?;
        if deleted == 0 {
            return Err(StorageError::NotFound {
                entity_type: EntityKind::Artifact,
                id: id.0,
            });
        }
        Ok(())
    }

    async fn artifact_page(
        &self,
        filter: &ArtifactFilter,
        page: PageRequest,
    ) -> StorageResult<Page<Artifact>> {
        let mut sql = render_filter(filter);
        let conn = self.get_conn().await?;

        let count_sql = format!("SELECT COUNT(*) FROM artifact{}", sql.clause);
        let total: i64 = conn
            .query_one(count_sql.as_str(), &sql.param_refs())
            .await
            .map_err(query_failed)?
            .get(0);
        let total = u64::try_from(total).unwrap_or(0);

        if page.offset() >= total {
            return Ok(Page::new(Vec::new(), total, page.size()));
        }

        let limit = sql.push(Box::new(clamp_i64(page.size())));
        let offset = sql.push(Box::new(clamp_i64(page.offset())));
        let select_sql = format!(
            "SELECT {} FROM artifact{} ORDER BY id LIMIT ${} OFFSET ${}",
            ARTIFACT_COLUMNS, sql.clause, limit, offset
        );
        let rows = conn
            .query(select_sql.as_str(), &sql.param_refs())
            .await
            .map_err(query_failed)?;

        let items = rows.iter().map(artifact_from_row).collect();
        Ok(Page::new(items, total, page.size()))
    }

    async fn artifact_query(&self, filter: &ArtifactFilter) -> StorageResult<Vec<Artifact>> {
        let sql = render_filter(filter);
        let conn = self.get_conn().await?;
        let select_sql = format!(
            "SELECT {} FROM artifact{} ORDER BY id",
            ARTIFACT_COLUMNS, sql.clause
        );
        let rows = conn
            .query(select_sql.as_str(), &sql.param_refs())
            .await
            .map_err(query_failed)?;
        Ok(rows.iter().map(artifact_from_row).collect())
    }

    // ========================================================================
    // HEALTH & DIAGNOSTICS
    // ========================================================================

    async fn ping(&self) -> StorageResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await.map_err(query_failed)?;
        Ok(())
    }

    async fn statistics(&self) -> StorageResult<StorageStatistics> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "SELECT (SELECT COUNT(*) FROM creator), (SELECT COUNT(*) FROM artifact)",
                &[],
            )
            .await
            .map_err(query_failed)?;
        let creators: i64 = row.get(0);
        let artifacts: i64 = row.get(1);
        Ok(StorageStatistics {
            creator_count: u64::try_from(creators).unwrap_or(0),
            artifact_count: u64::try_from(artifacts).unwrap_or(0),
        })
    }
}
