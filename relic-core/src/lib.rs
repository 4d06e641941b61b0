//! RELIC Core - Entity Types and Pipeline Primitives
//!
//! Data structures shared by every other crate: identity newtypes, the
//! creator and artifact entities, error taxonomy, plus the pure pieces of
//! the list/report/import pipeline (filter predicates, paging arithmetic,
//! CSV rendering and incremental JSON array scanning).
//!
//! Nothing in here touches storage or the network.

pub mod entities;
pub mod error;
pub mod filter;
pub mod identity;
pub mod page;
pub mod report;
pub mod stream;
pub mod validate;

pub use entities::{
    Artifact, ArtifactDraft, Creator, CreatorDraft, MAX_NAME_CHARS, MAX_ORIGIN_CHARS,
    MAX_POWER_LEVEL, MAX_TAGS_CHARS, MAX_TEXT_CHARS,
};
pub use error::{RelicError, RelicResult, StorageError, StreamError, ValidationError};
pub use filter::{ArtifactFilter, Bound, Predicate, RangeFilter};
pub use identity::{ArtifactId, CreatorId, EntityIdType, EntityKind};
pub use page::{total_pages, Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use report::{render_artifact_report, write_artifact_report, ReportRow, REPORT_HEADER};
pub use stream::{ArrayElement, JsonArrayScanner, DEFAULT_MAX_ELEMENT_BYTES};
