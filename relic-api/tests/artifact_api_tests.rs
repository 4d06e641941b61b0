//! HTTP tests for the artifact endpoints over the in-memory store.

use axum::http::{header, StatusCode};
use relic_api::ApiConfig;
use relic_test_utils::assertions::{assert_error, assert_status};
use relic_test_utils::fixtures::{
    artifact_request, celebrimbor, one_ring, sauron, test_router, test_router_with,
};
use relic_test_utils::http::{
    delete, get, multipart_request, post_json, put_json, send, TestResponse,
};
use relic_test_utils::{CreatorId, RelicStore};
use serde_json::{json, to_value, Value};

fn body(value: impl serde::Serialize) -> Value {
    to_value(value).unwrap()
}

async fn create_creator(router: &axum::Router, request: Value) -> CreatorId {
    let response = post_json(router, "/api/v1/creators", &request).await;
    assert_status(&response, StatusCode::CREATED);
    CreatorId(response.json()["id"].as_i64().unwrap())
}

async fn upload(router: &axum::Router, content_type: Option<&str>, file: &str) -> TestResponse {
    send(
        router,
        multipart_request("/api/v1/artifacts/upload", "file", content_type, file.as_bytes()),
    )
    .await
}

#[tokio::test]
async fn one_ring_scenario() {
    let (router, _store) = test_router();
    let sauron_id = create_creator(&router, body(sauron())).await;

    let created = post_json(&router, "/api/v1/artifacts", &body(one_ring(sauron_id))).await;
    assert_status(&created, StatusCode::CREATED);
    let details = created.json();
    assert_eq!(details["name"], "One Ring");
    assert_eq!(details["origin"], "Mordor");
    assert_eq!(details["tags"], "ring,power");
    assert_eq!(details["yearCreated"], 1600);
    assert_eq!(details["powerLevel"], 10_000);
    assert_eq!(
        details["creator"],
        json!({"id": sauron_id.0, "name": "Sauron", "race": "Maia", "realm": "Mordor"})
    );

    let id = details["id"].as_i64().unwrap();
    let fetched = get(&router, &format!("/api/v1/artifacts/{id}")).await;
    assert_status(&fetched, StatusCode::OK);
    assert_eq!(fetched.json(), details);

    let duplicate = post_json(
        &router,
        "/api/v1/creators",
        &json!({"name": "sauron", "race": "Maia", "realm": "Mordor"}),
    )
    .await;
    assert_error(&duplicate, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_validates_and_checks_creator() {
    let (router, _store) = test_router();
    let sauron_id = create_creator(&router, body(sauron())).await;

    let mut too_strong = one_ring(sauron_id);
    too_strong.power_level = Some(10_001);
    assert_error(
        &post_json(&router, "/api/v1/artifacts", &body(too_strong)).await,
        StatusCode::BAD_REQUEST,
    );

    let mut nameless = one_ring(sauron_id);
    nameless.name = None;
    assert_error(
        &post_json(&router, "/api/v1/artifacts", &body(nameless)).await,
        StatusCode::BAD_REQUEST,
    );

    assert_error(
        &post_json(&router, "/api/v1/artifacts", &body(one_ring(CreatorId(999)))).await,
        StatusCode::NOT_FOUND,
    );
}

#[tokio::test]
async fn update_and_delete_artifact() {
    let (router, _store) = test_router();
    let sauron_id = create_creator(&router, body(sauron())).await;
    let celebrimbor_id = create_creator(&router, body(celebrimbor())).await;
    let id = post_json(&router, "/api/v1/artifacts", &body(one_ring(sauron_id)))
        .await
        .json()["id"]
        .as_i64()
        .unwrap();

    let replacement = artifact_request("Narya", celebrimbor_id, None, None, Some(800));
    let updated = put_json(&router, &format!("/api/v1/artifacts/{id}"), &body(replacement)).await;
    assert_status(&updated, StatusCode::OK);
    let updated = updated.json();
    assert_eq!(updated["name"], "Narya");
    assert_eq!(updated["origin"], Value::Null);
    assert_eq!(updated["tags"], Value::Null);
    assert_eq!(updated["creator"]["name"], "Celebrimbor");

    assert_error(
        &put_json(&router, "/api/v1/artifacts/999", &body(one_ring(sauron_id))).await,
        StatusCode::NOT_FOUND,
    );

    assert_status(
        &delete(&router, &format!("/api/v1/artifacts/{id}")).await,
        StatusCode::NO_CONTENT,
    );
    assert_error(
        &get(&router, &format!("/api/v1/artifacts/{id}")).await,
        StatusCode::NOT_FOUND,
    );
    assert_error(
        &delete(&router, &format!("/api/v1/artifacts/{id}")).await,
        StatusCode::NOT_FOUND,
    );
    assert_error(
        &get(&router, "/api/v1/artifacts/abc").await,
        StatusCode::BAD_REQUEST,
    );
}

async fn seed_rings(router: &axum::Router) -> (CreatorId, CreatorId) {
    let sauron_id = create_creator(router, body(sauron())).await;
    let celebrimbor_id = create_creator(router, body(celebrimbor())).await;
    let rows = [
        ("One Ring", sauron_id, Some("Mordor"), Some(1600), Some(10_000)),
        ("Narya", celebrimbor_id, Some("Eregion"), Some(1590), Some(800)),
        ("Nenya", celebrimbor_id, Some("eregion"), Some(1590), Some(850)),
        ("Vilya", celebrimbor_id, Some("Eregion"), Some(1590), None),
        ("Morgul Blade", sauron_id, Some("MORDOR"), None, Some(300)),
    ];
    for (name, creator, origin, year, power) in rows {
        let request = artifact_request(name, creator, origin, year, power);
        let response = post_json(router, "/api/v1/artifacts", &body(request)).await;
        assert_status(&response, StatusCode::CREATED);
    }
    (sauron_id, celebrimbor_id)
}

fn names(response: &TestResponse) -> Vec<String> {
    response.json()["list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let (router, _store) = test_router();
    let (sauron_id, celebrimbor_id) = seed_rings(&router).await;

    let all = post_json(&router, "/api/v1/artifacts/_list", &json!({})).await;
    assert_status(&all, StatusCode::OK);
    assert_eq!(all.json()["totalPages"], 1);
    assert_eq!(names(&all).len(), 5);

    let mordor = post_json(
        &router,
        "/api/v1/artifacts/_list",
        &json!({"origin": "mordor"}),
    )
    .await;
    assert_eq!(names(&mordor), vec!["One Ring", "Morgul Blade"]);

    let elven = post_json(
        &router,
        "/api/v1/artifacts/_list",
        &json!({"creatorId": celebrimbor_id.0, "powerFrom": 810}),
    )
    .await;
    assert_eq!(names(&elven), vec!["Nenya"]);

    let by_year = post_json(
        &router,
        "/api/v1/artifacts/_list",
        &json!({"creatorId": sauron_id.0, "yearTo": 2000}),
    )
    .await;
    assert_eq!(names(&by_year), vec!["One Ring"]);

    let page = post_json(
        &router,
        "/api/v1/artifacts/_list",
        &json!({"page": 1, "size": 2}),
    )
    .await;
    assert_eq!(page.json()["totalPages"], 3);
    assert_eq!(names(&page), vec!["Nenya", "Vilya"]);

    let past_end = post_json(
        &router,
        "/api/v1/artifacts/_list",
        &json!({"page": 9, "size": 2}),
    )
    .await;
    assert_eq!(past_end.json()["totalPages"], 3);
    assert!(names(&past_end).is_empty());

    let none = post_json(
        &router,
        "/api/v1/artifacts/_list",
        &json!({"yearFrom": 2000, "yearTo": 1000}),
    )
    .await;
    assert_eq!(none.json()["totalPages"], 0);

    assert_error(
        &post_json(&router, "/api/v1/artifacts/_list", &json!({"page": -1})).await,
        StatusCode::BAD_REQUEST,
    );
    assert_error(
        &post_json(&router, "/api/v1/artifacts/_list", &json!({"size": 0})).await,
        StatusCode::BAD_REQUEST,
    );
}

#[tokio::test]
async fn list_uses_configured_default_page_size() {
    let config = ApiConfig {
        default_page_size: 2,
        ..ApiConfig::default()
    };
    let (router, _store) = test_router_with(config);
    seed_rings(&router).await;

    let first = post_json(&router, "/api/v1/artifacts/_list", &json!({})).await;
    assert_eq!(first.json()["totalPages"], 3);
    assert_eq!(names(&first), vec!["One Ring", "Narya"]);
}

#[tokio::test]
async fn report_is_a_csv_attachment() {
    let (router, _store) = test_router();
    let (sauron_id, _) = seed_rings(&router).await;
    let quoted = artifact_request("a,\"b\"", sauron_id, None, None, None);
    post_json(&router, "/api/v1/artifacts", &body(quoted)).await;

    let report = post_json(
        &router,
        "/api/v1/artifacts/_report",
        &json!({"creatorId": sauron_id.0}),
    )
    .await;
    assert_status(&report, StatusCode::OK);
    assert_eq!(
        report.header(header::CONTENT_TYPE),
        Some("text/csv; charset=utf-8")
    );
    assert_eq!(
        report.header(header::CONTENT_DISPOSITION),
        Some("attachment; filename=\"artifacts-report.csv\"")
    );

    let text = report.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Id,Name,Origin,Tags,Year Created,Power Level,Creator Name,Creator Race,Creator Realm"
    );
    assert_eq!(lines.len(), 4);
    assert!(lines[1].ends_with(",One Ring,Mordor,,1600,10000,Sauron,Maia,Mordor"));
    assert!(lines[3].contains(r#","a,""b""",,,,"#));
    assert!(text.ends_with('\n'));
}

#[tokio::test]
async fn empty_report_has_only_the_header() {
    let (router, _store) = test_router();
    let report = post_json(&router, "/api/v1/artifacts/_report", &json!({})).await;
    assert_status(&report, StatusCode::OK);
    assert_eq!(report.text().lines().count(), 1);
}

#[tokio::test]
async fn upload_imports_valid_records_and_counts_failures() {
    let (router, store) = test_router();
    let sauron_id = create_creator(&router, body(sauron())).await;

    let file = format!(
        r#"[
            {{"name": "One Ring", "creatorId": {id}, "powerLevel": 10000}},
            {{"name": "", "creatorId": {id}}},
            {{"name": "Ringwraith Blade", "creatorId": 777}},
            "not an object",
            {{"name": "Palantir", "creatorId": {id}, "origin": "Numenor"}},
        ]"#,
        id = sauron_id.0
    );
    let response = upload(&router, Some("application/json"), &file).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(response.json(), json!({"imported": 2, "failed": 4}));

    let stats = store.statistics().await.unwrap();
    assert_eq!(stats.artifact_count, 2);
}

#[tokio::test]
async fn upload_rejects_bad_files() {
    let (router, _store) = test_router();

    assert_error(
        &upload(&router, Some("text/plain"), "[]").await,
        StatusCode::BAD_REQUEST,
    );

    let empty = upload(&router, Some("application/json"), "").await;
    assert_error(&empty, StatusCode::BAD_REQUEST);
    assert_eq!(empty.json()["message"], "File must not be empty");

    assert_error(
        &upload(&router, None, r#"{"name": "One Ring"}"#).await,
        StatusCode::BAD_REQUEST,
    );

    let wrong_field = send(
        &router,
        multipart_request("/api/v1/artifacts/upload", "document", None, b"[]"),
    )
    .await;
    assert_error(&wrong_field, StatusCode::BAD_REQUEST);

    let charset = upload(&router, Some("application/json; charset=utf-8"), "[]").await;
    assert_status(&charset, StatusCode::OK);
    assert_eq!(charset.json(), json!({"imported": 0, "failed": 0}));
}

#[tokio::test]
async fn upload_accepts_byte_order_mark() {
    let (router, store) = test_router();
    let sauron_id = create_creator(&router, body(sauron())).await;

    let file = format!("\u{FEFF}[{{\"name\":\"One Ring\",\"creatorId\":{}}}]", sauron_id.0);
    let response = upload(&router, Some("application/json"), &file).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(response.json(), json!({"imported": 1, "failed": 0}));
    assert_eq!(store.statistics().await.unwrap().artifact_count, 1);
}

#[tokio::test]
async fn upload_larger_than_limit_is_rejected() {
    let config = ApiConfig {
        max_upload_bytes: 64,
        ..ApiConfig::default()
    };
    let (router, store) = test_router_with(config);
    let file = format!("[{}]", vec![r#"{"name":"x","creatorId":1}"#; 100].join(","));

    let response = upload(&router, Some("application/json"), &file).await;
    assert_error(&response, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(store.statistics().await.unwrap().artifact_count, 0);
}

#[tokio::test]
async fn health_and_openapi_endpoints() {
    let (router, _store) = test_router();

    let ping = get(&router, "/health/ping").await;
    assert_status(&ping, StatusCode::OK);
    assert_eq!(ping.text(), "pong");

    let ready = get(&router, "/health/ready").await;
    assert_status(&ready, StatusCode::OK);
    assert_eq!(ready.json()["status"], "healthy");

    assert_status(&get(&router, "/health/live").await, StatusCode::OK);

    let spec = get(&router, "/openapi.json").await;
    assert_status(&spec, StatusCode::OK);
    assert!(spec.json()["paths"]["/api/v1/artifacts/_list"].is_object());
}
