//! OpenAPI Specification for RELIC API
//!
//! This module defines the OpenAPI document for the RELIC REST API.
//! It uses utoipa to generate the OpenAPI specification from Rust types
//! and route annotations.

use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::routes::artifact::ArtifactUploadForm;
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use crate::routes::{artifact, creator, health};
use crate::types::*;

/// OpenAPI document for RELIC API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "RELIC API",
        version = "0.1.0",
        description = "Archive of legendary artifacts and their creators",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Artifacts", description = "Artifact CRUD, listing, bulk import and CSV reports"),
        (name = "Creators", description = "Creators of artifacts; names are unique ignoring case"),
        (name = "Health", description = "Liveness and readiness probes")
    ),
    paths(
        // === Artifact Routes ===
        artifact::create_artifact,
        artifact::get_artifact,
        artifact::list_artifacts,
        artifact::update_artifact,
        artifact::delete_artifact,
        artifact::upload_artifacts,
        artifact::report_artifacts,
        // === Creator Routes ===
        creator::list_creators,
        creator::create_creator,
        creator::get_creator,
        creator::update_creator,
        creator::delete_creator,
        // === Health Routes ===
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        ErrorBody,
        ArtifactSaveRequest,
        ArtifactFilterRequest,
        ArtifactListRequest,
        ArtifactDetailsResponse,
        ArtifactListResponse,
        ArtifactUploadForm,
        ImportSummary,
        CreatorSaveRequest,
        CreatorResponse,
        HealthResponse,
        HealthStatus,
        HealthDetails,
        ComponentHealth,
    ))
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Pretty-printed JSON document.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() -> Result<(), serde_json::Error> {
        let doc = serde_json::to_value(ApiDoc::openapi())?;
        let paths = doc["paths"].as_object().map(|p| p.len()).unwrap_or(0);
        // artifacts, {id}, _list, upload, _report, creators, creators/{id}, 3 health
        assert_eq!(paths, 10);
        assert!(doc["components"]["schemas"]["ArtifactDetailsResponse"].is_object());
        Ok(())
    }

    #[test]
    fn test_to_json_is_pretty() -> Result<(), serde_json::Error> {
        let json = ApiDoc::to_json()?;
        assert!(json.contains("\n  \"openapi\""));
        Ok(())
    }
}
