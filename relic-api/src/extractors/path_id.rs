//! Custom path extractors for type-safe entity IDs.
//!
//! Provides `PathId<T>` extractor that works with EntityIdType newtypes
//! and provides rich error messages.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use relic_core::EntityIdType;

use crate::error::ApiError;

/// Extractor for type-safe entity IDs from path parameters.
///
/// Unlike the standard `Path<i64>` extractor, `PathId<T>` provides:
/// - Type-safe extraction into specific ID types (CreatorId, ArtifactId)
/// - Error messages naming the entity type
///
/// # Example
///
/// ```rust,ignore
/// use relic_core::ArtifactId;
///
/// async fn get_artifact(
///     PathId(artifact_id): PathId<ArtifactId>,
/// ) -> ApiResult<impl IntoResponse> {
///     // artifact_id is ArtifactId, not i64
///     service.get(artifact_id).await
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathId<T: EntityIdType>(pub T);

/// Error returned when PathId extraction fails.
#[derive(Debug)]
pub struct PathIdError {
    pub entity_name: &'static str,
    pub path_param: String,
    pub message: String,
}

impl std::fmt::Display for PathIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid {} ID '{}': {}",
            self.entity_name, self.path_param, self.message
        )
    }
}

impl std::error::Error for PathIdError {}

impl IntoResponse for PathIdError {
    fn into_response(self) -> Response {
        ApiError::invalid_format(self.to_string()).into_response()
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: EntityIdType,
{
    type Rejection = PathIdError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<i64> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| PathIdError {
                entity_name: T::ENTITY_NAME,
                path_param: last_segment(parts.uri.path()).to_string(),
                message: format!("expected an integer id ({})", e),
            })?;

        Ok(PathId(T::new(raw)))
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
