//! Creator REST API Routes

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use relic_core::CreatorId;

#[cfg(feature = "openapi")]
use crate::error::ErrorBody;
use crate::{
    error::ApiResult,
    extractors::{ApiJson, PathId},
    services::CreatorService,
    state::AppState,
    types::{CreatorResponse, CreatorSaveRequest},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/creators - List all creators
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/creators",
    tag = "Creators",
    responses(
        (status = 200, description = "All creators, ascending by id", body = Vec<CreatorResponse>),
    ),
))]
pub async fn list_creators(
    State(service): State<CreatorService>,
) -> ApiResult<Json<Vec<CreatorResponse>>> {
    Ok(Json(service.list_all().await?))
}

/// POST /api/v1/creators - Create a new creator
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/creators",
    tag = "Creators",
    request_body = CreatorSaveRequest,
    responses(
        (status = 201, description = "Creator created", body = CreatorResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody),
    ),
))]
pub async fn create_creator(
    State(service): State<CreatorService>,
    ApiJson(req): ApiJson<CreatorSaveRequest>,
) -> ApiResult<impl IntoResponse> {
    let creator = service.create(req).await?;
    Ok((StatusCode::CREATED, Json(creator)))
}

/// GET /api/v1/creators/{id} - Get creator by ID
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/creators/{id}",
    tag = "Creators",
    params(
        ("id" = i64, Path, description = "Creator ID")
    ),
    responses(
        (status = 200, description = "Creator details", body = CreatorResponse),
        (status = 404, description = "Creator not found", body = ErrorBody),
    ),
))]
pub async fn get_creator(
    State(service): State<CreatorService>,
    PathId(id): PathId<CreatorId>,
) -> ApiResult<Json<CreatorResponse>> {
    Ok(Json(service.get(id).await?))
}

/// PUT /api/v1/creators/{id} - Replace a creator
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/api/v1/creators/{id}",
    tag = "Creators",
    params(
        ("id" = i64, Path, description = "Creator ID")
    ),
    request_body = CreatorSaveRequest,
    responses(
        (status = 200, description = "Creator updated", body = CreatorResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Creator not found", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody),
    ),
))]
pub async fn update_creator(
    State(service): State<CreatorService>,
    PathId(id): PathId<CreatorId>,
    ApiJson(req): ApiJson<CreatorSaveRequest>,
) -> ApiResult<Json<CreatorResponse>> {
    Ok(Json(service.update(id, req).await?))
}

/// DELETE /api/v1/creators/{id} - Delete a creator
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/v1/creators/{id}",
    tag = "Creators",
    params(
        ("id" = i64, Path, description = "Creator ID")
    ),
    responses(
        (status = 204, description = "Creator deleted"),
        (status = 404, description = "Creator not found", body = ErrorBody),
        (status = 409, description = "Creator still has artifacts", body = ErrorBody),
    ),
))]
pub async fn delete_creator(
    State(service): State<CreatorService>,
    PathId(id): PathId<CreatorId>,
) -> ApiResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_creators).post(create_creator))
        .route(
            "/:id",
            get(get_creator).put(update_creator).delete(delete_creator),
        )
}
