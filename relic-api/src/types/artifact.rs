//! Artifact-related API types

use relic_core::{
    Artifact, ArtifactDraft, ArtifactFilter, ArtifactId, Creator, CreatorId, PageRequest,
    RangeFilter, ValidationError,
};
use serde::{Deserialize, Serialize};

use super::CreatorResponse;

/// Request body for creating or replacing an artifact. Also the shape of
/// each element of an import file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct ArtifactSaveRequest {
    pub name: Option<String>,
    /// Id of an existing creator
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub creator_id: Option<CreatorId>,
    pub origin: Option<String>,
    /// Free-form tag text, at most 500 characters
    pub tags: Option<String>,
    /// Non-negative year
    pub year_created: Option<i32>,
    /// 0 to 10000 inclusive
    pub power_level: Option<i32>,
}

impl ArtifactSaveRequest {
    pub fn into_draft(self) -> Result<ArtifactDraft, ValidationError> {
        ArtifactDraft::new(
            self.name,
            self.creator_id,
            self.origin,
            self.tags,
            self.year_created,
            self.power_level,
        )
    }
}

/// Filter criteria shared by list and report requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct ArtifactFilterRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub creator_id: Option<CreatorId>,
    /// Exact match, ignoring case
    pub origin: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub power_from: Option<i32>,
    pub power_to: Option<i32>,
}

impl ArtifactFilterRequest {
    /// A blank origin is treated as absent, so it matches every artifact
    /// instead of only those with an empty origin.
    pub fn to_filter(&self) -> ArtifactFilter {
        ArtifactFilter {
            creator_id: self.creator_id,
            origin: self
                .origin
                .as_ref()
                .filter(|o| !o.trim().is_empty())
                .cloned(),
            year: RangeFilter::new(self.year_from, self.year_to),
            power: RangeFilter::new(self.power_from, self.power_to),
        }
    }
}

/// Body of `POST /artifacts/_list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct ArtifactListRequest {
    #[serde(flatten)]
    pub filter: ArtifactFilterRequest,
    /// Zero-based page index, defaults to 0
    pub page: Option<i64>,
    /// Page size, defaults to the configured page size
    pub size: Option<i64>,
}

impl ArtifactListRequest {
    pub fn page_request(&self, default_size: u64) -> Result<PageRequest, ValidationError> {
        PageRequest::from_optional(self.page, self.size, default_size)
    }
}

/// Body of `POST /artifacts/_report`.
pub type ArtifactReportRequest = ArtifactFilterRequest;

/// Artifact with its creator joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDetailsResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub id: ArtifactId,
    pub name: String,
    pub origin: Option<String>,
    pub tags: Option<String>,
    pub year_created: Option<i32>,
    pub power_level: Option<i32>,
    pub creator: Option<CreatorResponse>,
}

impl ArtifactDetailsResponse {
    pub fn new(artifact: Artifact, creator: Option<Creator>) -> Self {
        Self {
            id: artifact.id,
            name: artifact.name,
            origin: artifact.origin,
            tags: artifact.tags,
            year_created: artifact.year_created,
            power_level: artifact.power_level,
            creator: creator.map(CreatorResponse::from),
        }
    }
}

/// One page of artifact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ArtifactListResponse {
    pub list: Vec<ArtifactDetailsResponse>,
    pub total_pages: u64,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Records persisted
    pub imported: u64,
    /// Records that failed to decode, validate or persist
    pub failed: u64,
}

impl ImportSummary {
    pub fn total(&self) -> u64 {
        self.imported + self.failed
    }
}
