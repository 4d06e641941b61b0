//! Streaming artifact import
//!
//! Drives a [`JsonArrayScanner`] over an upload body one chunk at a time
//! and hands each decoded record to a persist callback. A record that fails
//! to decode or persist is counted and skipped; only stream-level problems
//! (not an array, empty file, read failure) abort the whole import.

use std::future::Future;

use futures_util::{Stream, StreamExt};
use relic_core::{ArrayElement, JsonArrayScanner, StreamError};

use crate::error::{ApiError, ApiResult};
use crate::types::{ArtifactSaveRequest, ImportSummary};

/// The only accepted media type for an import file.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Check a declared part content type. Parameters such as `charset` are
/// ignored; an absent content type is accepted.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), StreamError> {
    let Some(declared) = content_type else {
        return Ok(());
    };
    let media_type = declared.split(';').next().unwrap_or_default().trim();
    if media_type.eq_ignore_ascii_case(JSON_MEDIA_TYPE) {
        Ok(())
    } else {
        Err(StreamError::UnsupportedContentType {
            content_type: declared.to_string(),
        })
    }
}

/// Continue-on-error import loop over a chunked body.
#[derive(Debug)]
pub struct ArtifactImporter {
    scanner: JsonArrayScanner,
    summary: ImportSummary,
    pending: Vec<ArrayElement>,
    index: u64,
}

impl ArtifactImporter {
    pub fn new(max_record_bytes: usize) -> Self {
        Self {
            scanner: JsonArrayScanner::new(max_record_bytes),
            summary: ImportSummary::default(),
            pending: Vec::new(),
            index: 0,
        }
    }

    /// Consume `chunks` to the end, persisting every decodable record.
    ///
    /// Records persisted before a read error stay persisted; the error is
    /// still returned for the request as a whole.
    pub async fn run<S, B, E, F, Fut, T>(
        mut self,
        chunks: S,
        mut persist: F,
    ) -> ApiResult<ImportSummary>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<ApiError>,
        F: FnMut(ArtifactSaveRequest) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let mut chunks = std::pin::pin!(chunks);

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(Into::into)?;
            self.scanner.feed(chunk.as_ref(), &mut self.pending)?;
            self.drain(&mut persist).await;
        }

        self.scanner.finish(&mut self.pending)?;
        self.drain(&mut persist).await;

        if self.scanner.was_truncated() {
            tracing::warn!(
                bytes = self.scanner.bytes_seen(),
                "Import file ended before the closing bracket"
            );
        }
        if self.scanner.has_trailing_content() {
            tracing::warn!("Ignoring content after the closing bracket of the import file");
        }

        tracing::info!(
            imported = self.summary.imported,
            failed = self.summary.failed,
            "Artifact import finished"
        );
        Ok(self.summary)
    }

    async fn drain<F, Fut, T>(&mut self, persist: &mut F)
    where
        F: FnMut(ArtifactSaveRequest) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        for element in std::mem::take(&mut self.pending) {
            let index = self.index;
            self.index += 1;

            let outcome = match element {
                ArrayElement::Invalid(reason) => Err(reason),
                ArrayElement::Value(bytes) => {
                    match serde_json::from_slice::<ArtifactSaveRequest>(&bytes) {
                        Ok(request) => {
                            persist(request).await.map(|_| ()).map_err(|e| e.message)
                        }
                        Err(e) => Err(format!("Invalid JSON: {}", e)),
                    }
                }
            };

            match outcome {
                Ok(()) => self.summary.imported += 1,
                Err(reason) => {
                    tracing::debug!(index, %reason, "Skipping artifact record");
                    self.summary.failed += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunked(body: &str, size: usize) -> Vec<Result<Vec<u8>, ApiError>> {
        body.as_bytes()
            .chunks(size)
            .map(|c| Ok(c.to_vec()))
            .collect()
    }

    async fn count_valid(body: &str, size: usize) -> ApiResult<ImportSummary> {
        ArtifactImporter::new(1024)
            .run(stream::iter(chunked(body, size)), |request| async move {
                request.into_draft().map_err(ApiError::from)
            })
            .await
    }

    #[test]
    fn test_content_type_check() {
        assert!(check_content_type(None).is_ok());
        assert!(check_content_type(Some("application/json")).is_ok());
        assert!(check_content_type(Some("Application/JSON; charset=utf-8")).is_ok());
        assert_eq!(
            check_content_type(Some("text/plain")),
            Err(StreamError::UnsupportedContentType {
                content_type: "text/plain".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_mixed_records() {
        let body = r#"[
            {"name": "One Ring", "creatorId": 1},
            {"name": "", "creatorId": 1},
            {"name": 5},
            7,
            {"name": "Nenya", "creatorId": 2, "powerLevel": 900}
        ]"#;
        for size in [1, 3, 64, 4096] {
            let summary = count_valid(body, size).await.unwrap();
            assert_eq!(summary, ImportSummary { imported: 2, failed: 3 });
        }
    }

    #[tokio::test]
    async fn test_truncated_upload_still_counts() {
        let summary = count_valid(r#"[{"name":"A","creatorId":1},{"name":"B""#, 8)
            .await
            .unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, failed: 1 });
    }

    #[tokio::test]
    async fn test_stream_level_errors() {
        let err = count_valid("", 4).await.unwrap_err();
        assert_eq!(err.message, "File must not be empty");

        let err = count_valid(r#"{"name":"A"}"#, 4).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_read_error_keeps_persisted_records() {
        let chunks: Vec<Result<&[u8], ApiError>> = vec![
            Ok(br#"[{"name":"A","creatorId":1},"#.as_slice()),
            Err(ApiError::invalid_format("connection reset")),
        ];
        let mut persisted = 0;
        let result = ArtifactImporter::new(1024)
            .run(stream::iter(chunks), |_request| {
                persisted += 1;
                async { Ok::<_, ApiError>(()) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(persisted, 1);
    }

    #[tokio::test]
    async fn test_persist_failures_are_counted() {
        let chunks: Vec<Result<&[u8], ApiError>> =
            vec![Ok(br#"[{"name":"A","creatorId":1},{"name":"B","creatorId":99}]"#.as_slice())];
        let summary = ArtifactImporter::new(1024)
            .run(stream::iter(chunks), |request| async move {
                match request.creator_id {
                    Some(id) if id.0 == 99 => Err(ApiError::entity_not_found("Creator", 99)),
                    _ => Ok(()),
                }
            })
            .await
            .unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, failed: 1 });
    }
}
