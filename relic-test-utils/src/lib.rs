//! RELIC Test Utilities
//!
//! Centralized test infrastructure for the RELIC workspace:
//! - Proptest generators for request and filter types
//! - Fixtures: an in-memory router and the usual sample data
//! - HTTP helpers for driving the router with `oneshot`
//! - Assertions on the error body shape

pub use relic_api::{
    AppState, ApiConfig, ArtifactDetailsResponse, ArtifactFilterRequest, ArtifactListRequest,
    ArtifactListResponse, ArtifactSaveRequest, CreatorResponse, CreatorSaveRequest,
    ImportSummary,
};
pub use relic_core::{ArtifactFilter, ArtifactId, CreatorId, RangeFilter};
pub use relic_storage::{InMemoryStore, RelicStore};

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    /// Names drawn from a small pool so case-insensitive clashes happen.
    pub fn arb_creator_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Sauron".to_string()),
            Just("sauron".to_string()),
            Just("Celebrimbor".to_string()),
            Just("Telchar".to_string()),
            Just("Fëanor".to_string()),
            "[A-Z][a-z]{2,12}",
        ]
    }

    pub fn arb_creator_save_request() -> impl Strategy<Value = CreatorSaveRequest> {
        (arb_creator_name(), "[A-Z][a-z]{2,8}", "[A-Z][a-z]{2,10}").prop_map(
            |(name, race, realm)| CreatorSaveRequest {
                name: Some(name),
                race: Some(race),
                realm: Some(realm),
            },
        )
    }

    pub fn arb_origin() -> impl Strategy<Value = Option<String>> {
        proptest::option::of(prop_oneof![
            Just("Mordor".to_string()),
            Just("mordor".to_string()),
            Just("Eregion".to_string()),
            Just("Belegost".to_string()),
        ])
    }

    /// A save request that passes validation for one of `creators`.
    pub fn arb_valid_artifact(creators: Vec<CreatorId>) -> impl Strategy<Value = ArtifactSaveRequest> {
        (
            "[A-Za-z ]{1,40}",
            proptest::sample::select(creators),
            arb_origin(),
            proptest::option::of("[a-z,]{0,30}"),
            proptest::option::of(0i32..3500),
            proptest::option::of(0i32..=10_000),
        )
            .prop_filter("name must not be blank", |(name, ..)| !name.trim().is_empty())
            .prop_map(|(name, creator, origin, tags, year, power)| ArtifactSaveRequest {
                name: Some(name),
                creator_id: Some(creator),
                origin,
                tags,
                year_created: year,
                power_level: power,
            })
    }

    /// One import array element that must be counted as failed.
    pub fn arb_bad_import_element() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(r#"{"creatorId": 1}"#.to_string()),
            Just(r#"{"name": "", "creatorId": 1}"#.to_string()),
            Just(r#"{"name": "Ring", "creatorId": 1, "powerLevel": 10001}"#.to_string()),
            Just(r#"{"name": "Ring", "creatorId": 1, "yearCreated": -1}"#.to_string()),
            Just(r#"{"name": 42}"#.to_string()),
            Just(r#"{"name": "Ring", "creatorId": 404404}"#.to_string()),
            Just("null".to_string()),
            Just("17".to_string()),
            Just(r#""ring""#.to_string()),
            Just("[]".to_string()),
            Just(r#"{"name": "Ring", "creatorId": "one"}"#.to_string()),
        ]
    }

    pub fn arb_filter_request() -> impl Strategy<Value = ArtifactFilterRequest> {
        (
            arb_origin(),
            proptest::option::of(0i32..3500),
            proptest::option::of(0i32..3500),
            proptest::option::of(0i32..=10_000),
            proptest::option::of(0i32..=10_000),
        )
            .prop_map(|(origin, year_from, year_to, power_from, power_to)| {
                ArtifactFilterRequest {
                    creator_id: None,
                    origin,
                    year_from,
                    year_to,
                    power_from,
                    power_to,
                }
            })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;
    use axum::Router;
    use std::sync::Arc;

    /// A router over a fresh in-memory store, plus a handle on the store.
    pub fn test_router() -> (Router, InMemoryStore) {
        test_router_with(ApiConfig::default())
    }

    pub fn test_router_with(config: ApiConfig) -> (Router, InMemoryStore) {
        let store = InMemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), config);
        (relic_api::create_api_router(state), store)
    }

    pub fn creator_request(name: &str, race: &str, realm: &str) -> CreatorSaveRequest {
        CreatorSaveRequest {
            name: Some(name.to_string()),
            race: Some(race.to_string()),
            realm: Some(realm.to_string()),
        }
    }

    pub fn sauron() -> CreatorSaveRequest {
        creator_request("Sauron", "Maia", "Mordor")
    }

    pub fn celebrimbor() -> CreatorSaveRequest {
        creator_request("Celebrimbor", "Elf", "Eregion")
    }

    pub fn one_ring(creator_id: CreatorId) -> ArtifactSaveRequest {
        ArtifactSaveRequest {
            name: Some("One Ring".to_string()),
            creator_id: Some(creator_id),
            origin: Some("Mordor".to_string()),
            tags: Some("ring,power".to_string()),
            year_created: Some(1600),
            power_level: Some(10_000),
        }
    }

    pub fn artifact_request(
        name: &str,
        creator_id: CreatorId,
        origin: Option<&str>,
        year_created: Option<i32>,
        power_level: Option<i32>,
    ) -> ArtifactSaveRequest {
        ArtifactSaveRequest {
            name: Some(name.to_string()),
            creator_id: Some(creator_id),
            origin: origin.map(str::to_string),
            tags: None,
            year_created,
            power_level,
        }
    }
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

pub mod http {
    use axum::{
        body::{to_bytes, Body},
        http::{header, HeaderMap, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    /// Boundary used by [`multipart_request`].
    pub const BOUNDARY: &str = "relic-test-boundary";

    /// Buffered response.
    #[derive(Debug)]
    pub struct TestResponse {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Vec<u8>,
    }

    impl TestResponse {
        pub fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap_or(Value::Null)
        }

        pub fn text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }

        pub fn header(&self, name: header::HeaderName) -> Option<&str> {
            self.headers.get(name).and_then(|v| v.to_str().ok())
        }
    }

    pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_default()
    }

    pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap_or_default()
    }

    /// A `multipart/form-data` request with a single file part.
    pub fn multipart_request(
        uri: &str,
        field: &str,
        content_type: Option<&str>,
        file: &[u8],
    ) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"artifacts.json\"\r\n")
                .as_bytes(),
        );
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(file);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap_or_default()
    }

    /// Send one request through a clone of the router.
    pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
        let response = match router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .map(|b| b.to_vec())
            .unwrap_or_default();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn post_json(router: &Router, uri: &str, body: &Value) -> TestResponse {
        send(router, json_request(Method::POST, uri, body)).await
    }

    pub async fn put_json(router: &Router, uri: &str, body: &Value) -> TestResponse {
        send(router, json_request(Method::PUT, uri, body)).await
    }

    pub async fn get(router: &Router, uri: &str) -> TestResponse {
        send(router, empty_request(Method::GET, uri)).await
    }

    pub async fn delete(router: &Router, uri: &str) -> TestResponse {
        send(router, empty_request(Method::DELETE, uri)).await
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    use axum::http::StatusCode;

    use crate::http::TestResponse;

    /// Assert the status and the `{status, error, message}` body shape.
    pub fn assert_error(response: &TestResponse, expected: StatusCode) {
        assert_eq!(
            response.status,
            expected,
            "unexpected status, body: {}",
            response.text()
        );
        let body = response.json();
        assert_eq!(body["status"], expected.as_u16());
        assert_eq!(
            body["error"].as_str(),
            expected.canonical_reason(),
            "error must be the reason phrase"
        );
        assert!(body["message"].is_string(), "message must be a string");
    }

    pub fn assert_status(response: &TestResponse, expected: StatusCode) {
        assert_eq!(
            response.status,
            expected,
            "unexpected status, body: {}",
            response.text()
        );
    }
}
