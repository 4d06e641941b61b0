//! Property tests driving the HTTP surface over the in-memory store.
//!
//! - Import: an array of K elements with F bad ones reports
//!   `{imported: K-F, failed: F}` and persists exactly K-F artifacts.
//! - Round trip: an artifact read back by id equals what was created.

use axum::http::StatusCode;
use proptest::prelude::*;
use relic_test_utils::fixtures::{sauron, test_router};
use relic_test_utils::generators::{arb_bad_import_element, arb_valid_artifact};
use relic_test_utils::http::{get, multipart_request, post_json, send};
use relic_test_utils::{ArtifactSaveRequest, CreatorId, ImportSummary, RelicStore};
use serde_json::{json, Value};
use tokio::runtime::Runtime;

fn test_runtime() -> Result<Runtime, TestCaseError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

/// The first creator inserted into a fresh store.
const SAURON: CreatorId = CreatorId(1);

#[derive(Debug, Clone)]
enum Element {
    Good(ArtifactSaveRequest),
    Bad(String),
}

impl Element {
    fn to_json(&self) -> String {
        match self {
            Element::Good(request) => serde_json::to_string(request).unwrap_or_default(),
            Element::Bad(raw) => raw.clone(),
        }
    }
}

fn element_strategy() -> impl Strategy<Value = Element> {
    prop_oneof![
        arb_valid_artifact(vec![SAURON]).prop_map(Element::Good),
        arb_bad_import_element().prop_map(Element::Bad),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_import_counts_every_element(elements in proptest::collection::vec(element_strategy(), 0..25)) {
        let runtime = test_runtime()?;
        runtime.block_on(async {
            let (router, store) = test_router();
            let created = post_json(&router, "/api/v1/creators", &serde_json::to_value(sauron()).unwrap()).await;
            prop_assert_eq!(created.status, StatusCode::CREATED);
            prop_assert_eq!(created.json()["id"].as_i64(), Some(SAURON.0));

            let file = format!(
                "[{}]",
                elements.iter().map(Element::to_json).collect::<Vec<_>>().join(",\n")
            );
            let response = send(
                &router,
                multipart_request("/api/v1/artifacts/upload", "file", Some("application/json"), file.as_bytes()),
            )
            .await;
            prop_assert_eq!(response.status, StatusCode::OK);

            let bad = elements.iter().filter(|e| matches!(e, Element::Bad(_))).count() as u64;
            let good = elements.len() as u64 - bad;
            prop_assert_eq!(response.json(), json!({"imported": good, "failed": bad}));
            let summary: ImportSummary = serde_json::from_slice(&response.body)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(summary.total(), elements.len() as u64);

            let stats = store.statistics().await.map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(stats.artifact_count, good);
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_created_artifact_reads_back(request in arb_valid_artifact(vec![SAURON])) {
        let runtime = test_runtime()?;
        runtime.block_on(async {
            let (router, _store) = test_router();
            post_json(&router, "/api/v1/creators", &serde_json::to_value(sauron()).unwrap()).await;

            let created = post_json(&router, "/api/v1/artifacts", &serde_json::to_value(&request).unwrap()).await;
            prop_assert_eq!(created.status, StatusCode::CREATED);
            let created = created.json();

            prop_assert_eq!(&created["name"], &json!(request.name));
            prop_assert_eq!(&created["origin"], &json!(request.origin));
            prop_assert_eq!(&created["tags"], &json!(request.tags));
            prop_assert_eq!(&created["yearCreated"], &json!(request.year_created));
            prop_assert_eq!(&created["powerLevel"], &json!(request.power_level));
            prop_assert_eq!(&created["creator"]["id"], &json!(SAURON.0));

            let id = created["id"].as_i64().unwrap_or_default();
            let fetched = get(&router, &format!("/api/v1/artifacts/{id}")).await;
            prop_assert_eq!(fetched.status, StatusCode::OK);
            prop_assert_eq!(fetched.json(), created);
            Ok::<(), TestCaseError>(())
        })?;
    }
}

#[test]
fn element_json_is_an_object_for_good_records() {
    let element = Element::Good(ArtifactSaveRequest {
        name: Some("Narya".to_string()),
        creator_id: Some(SAURON),
        ..Default::default()
    });
    let value: Value = serde_json::from_str(&element.to_json()).unwrap();
    assert_eq!(value["creatorId"], 1);
}
