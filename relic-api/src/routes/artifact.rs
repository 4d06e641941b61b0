//! Artifact REST API Routes

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use relic_core::ArtifactId;

#[cfg(feature = "openapi")]
use crate::error::ErrorBody;
use crate::{
    error::{ApiError, ApiResult},
    extractors::{ApiJson, PathId},
    import::check_content_type,
    services::ArtifactService,
    state::AppState,
    types::{
        ArtifactDetailsResponse, ArtifactListRequest, ArtifactListResponse, ArtifactReportRequest,
        ArtifactSaveRequest, ImportSummary,
    },
};

/// Name of the multipart field carrying the import file.
pub const UPLOAD_FIELD: &str = "file";

/// File name suggested for the CSV report download.
pub const REPORT_FILE_NAME: &str = "artifacts-report.csv";

/// Multipart form of `POST /artifacts/upload`.
#[cfg(feature = "openapi")]
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct ArtifactUploadForm {
    /// JSON array of artifact records
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/artifacts - Create a new artifact
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/artifacts",
    tag = "Artifacts",
    request_body = ArtifactSaveRequest,
    responses(
        (status = 201, description = "Artifact created", body = ArtifactDetailsResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Creator not found", body = ErrorBody),
    ),
))]
pub async fn create_artifact(
    State(service): State<ArtifactService>,
    ApiJson(req): ApiJson<ArtifactSaveRequest>,
) -> ApiResult<impl IntoResponse> {
    let artifact = service.create(req).await?;
    Ok((StatusCode::CREATED, Json(artifact)))
}

/// GET /api/v1/artifacts/{id} - Get artifact by ID
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/artifacts/{id}",
    tag = "Artifacts",
    params(
        ("id" = i64, Path, description = "Artifact ID")
    ),
    responses(
        (status = 200, description = "Artifact details", body = ArtifactDetailsResponse),
        (status = 400, description = "Malformed ID", body = ErrorBody),
        (status = 404, description = "Artifact not found", body = ErrorBody),
    ),
))]
pub async fn get_artifact(
    State(service): State<ArtifactService>,
    PathId(id): PathId<ArtifactId>,
) -> ApiResult<Json<ArtifactDetailsResponse>> {
    Ok(Json(service.get(id).await?))
}

/// POST /api/v1/artifacts/_list - Filtered, paginated listing
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/artifacts/_list",
    tag = "Artifacts",
    request_body = ArtifactListRequest,
    responses(
        (status = 200, description = "One page of artifacts", body = ArtifactListResponse),
        (status = 400, description = "Invalid paging", body = ErrorBody),
    ),
))]
pub async fn list_artifacts(
    State(service): State<ArtifactService>,
    ApiJson(req): ApiJson<ArtifactListRequest>,
) -> ApiResult<Json<ArtifactListResponse>> {
    Ok(Json(service.list(req).await?))
}

/// PUT /api/v1/artifacts/{id} - Replace an artifact
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/api/v1/artifacts/{id}",
    tag = "Artifacts",
    params(
        ("id" = i64, Path, description = "Artifact ID")
    ),
    request_body = ArtifactSaveRequest,
    responses(
        (status = 200, description = "Artifact updated", body = ArtifactDetailsResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Artifact or creator not found", body = ErrorBody),
    ),
))]
pub async fn update_artifact(
    State(service): State<ArtifactService>,
    PathId(id): PathId<ArtifactId>,
    ApiJson(req): ApiJson<ArtifactSaveRequest>,
) -> ApiResult<Json<ArtifactDetailsResponse>> {
    Ok(Json(service.update(id, req).await?))
}

/// DELETE /api/v1/artifacts/{id} - Delete an artifact
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/v1/artifacts/{id}",
    tag = "Artifacts",
    params(
        ("id" = i64, Path, description = "Artifact ID")
    ),
    responses(
        (status = 204, description = "Artifact deleted"),
        (status = 404, description = "Artifact not found", body = ErrorBody),
    ),
))]
pub async fn delete_artifact(
    State(service): State<ArtifactService>,
    PathId(id): PathId<ArtifactId>,
) -> ApiResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/artifacts/upload - Bulk import from a JSON array file
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/artifacts/upload",
    tag = "Artifacts",
    request_body(content = ArtifactUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import finished", body = ImportSummary),
        (status = 400, description = "Missing, empty or non-array file", body = ErrorBody),
        (status = 413, description = "Upload too large", body = ErrorBody),
    ),
))]
pub async fn upload_artifacts(
    State(service): State<ArtifactService>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportSummary>> {
    let mut multipart = multipart.map_err(|e| ApiError::invalid_input(e.body_text()))?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        check_content_type(field.content_type())?;
        let summary = service.import(field).await?;
        return Ok(Json(summary));
    }
    Err(ApiError::missing_field(UPLOAD_FIELD))
}

/// POST /api/v1/artifacts/_report - CSV report of the filtered set
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/artifacts/_report",
    tag = "Artifacts",
    request_body = ArtifactReportRequest,
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid request", body = ErrorBody),
    ),
))]
pub async fn report_artifacts(
    State(service): State<ArtifactService>,
    ApiJson(req): ApiJson<ArtifactReportRequest>,
) -> ApiResult<impl IntoResponse> {
    let csv = service.report(&req).await?;
    let disposition = format!("attachment; filename=\"{}\"", REPORT_FILE_NAME);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the artifact router. `max_upload_bytes` bounds the upload body.
pub fn create_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(create_artifact))
        .route("/_list", post(list_artifacts))
        .route("/_report", post(report_artifacts))
        .route(
            "/upload",
            post(upload_artifacts).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/:id",
            get(get_artifact).put(update_artifact).delete(delete_artifact),
        )
}
