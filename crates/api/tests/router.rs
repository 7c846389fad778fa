//! Router tests driven through `tower::ServiceExt::oneshot`

use api::{create_router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    create_router(Arc::new(AppState::default()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_overheating_facts() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/diagnose",
            json!({ "high_temp": true, "loud_fan": true }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"].as_array().unwrap().len(), 1);
    assert_eq!(body["best"]["rule_id"], "R1");
    assert_eq!(body["best"]["confidence"], 90);
    assert_eq!(body["best"]["confidence_percent"], "90%");
    assert!(body.get("message").is_none());
    assert!(body["diagnosis_id"].is_string());
}

#[tokio::test]
async fn test_ranked_results() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/diagnose",
            json!({
                "blue_screen": true,
                "boot_loop": true,
                "recent_driver_install": true,
                "no_internet": true,
                "wifi_connected": true,
                "net_state": "wifi"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["rule_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["R4", "R5", "R3"]);
}

#[tokio::test]
async fn test_empty_facts_return_no_match() {
    let (status, body) = send(app(), post_json("/api/v1/diagnose", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!([]));
    assert!(body["best"].is_null());
    assert_eq!(
        body["message"],
        "No matching rule found for the provided symptoms."
    );
}

#[tokio::test]
async fn test_malformed_facts_are_rejected() {
    let (status, _) = send(
        app(),
        post_json("/api/v1/diagnose", json!({ "high_temp": 85 })),
    )
    .await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_string_ip_valid_is_truthy() {
    let facts = json!({ "no_internet": true, "wifi_connected": true, "ip_valid": "true" });
    let (status, body) = send(app(), post_json("/api/v1/diagnose", facts)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["best"].is_null());
    assert_eq!(body["facts_considered"], 3);

    let facts = json!({ "no_internet": true, "wifi_connected": true, "ip_valid": "" });
    let (_, body) = send(app(), post_json("/api/v1/diagnose", facts)).await;
    assert_eq!(body["best"]["rule_id"], "R3");
}

#[tokio::test]
async fn test_form_accepts_text_readings() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/diagnose/form",
            json!({ "symptoms": { "slow_pc": true }, "ram": "75", "disk": "90", "temp": "" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["best"]["rule_id"], "R2");
}

#[tokio::test]
async fn test_form_collects_and_diagnoses() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/diagnose/form",
            json!({
                "symptoms": { "slow_pc": true },
                "ram": 70,
                "disk": 95,
                "temp": 40,
                "net_state": "wired",
                "ip_valid": true
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["best"]["rule_id"], "R2");
}

#[tokio::test]
async fn test_form_below_threshold_has_no_match() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/diagnose/form",
            json!({ "symptoms": { "slow_pc": true }, "ram": 69, "disk": 95 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["best"].is_null());
}

#[tokio::test]
async fn test_form_validation_error() {
    let (status, body) = send(
        app(),
        post_json("/api/v1/diagnose/form", json!({ "ram": 50, "temp": 121 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        app(),
        post_json("/api/v1/diagnose/form", json!({ "temp": 120 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rule_catalog() {
    let (status, body) = send(app(), get("/api/v1/rules")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    let rules = body["rules"].as_array().unwrap();
    assert_eq!(rules[0]["id"], "R1");
    assert_eq!(rules[2]["confidence"], 75);
    assert_eq!(rules[4]["recommendations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_single_rule_lookup() {
    let (status, body) = send(app(), get("/api/v1/rules/R4")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Driver Boot Loop");

    let (status, body) = send(app(), get("/api/v1/rules/R42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["rule_count"], 5);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (status, body) = send(app(), get("/metrics")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}
