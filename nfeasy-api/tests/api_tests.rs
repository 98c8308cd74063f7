//! Integration tests for nfeasy-api endpoints
//!
//! Tests cover:
//! - Invoice listing, lookup, validation and status updates
//! - Workflow divergence resolution and force-resolve
//! - Workflow statistics
//! - EBS / EDAP simulator endpoints
//! - Error envelope and status codes
//!
//! Every app is built with zero delays and fixed outcomes.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use nfeasy_api::connectors::EdapConnector;
use nfeasy_api::outcome::FixedOutcome;
use nfeasy_api::store::{MemoryStore, RecordStore};
use nfeasy_api::{build_router, AppState};
use nfeasy_common::config::ServiceConfig;

/// Test helper: app over seeded fixtures with forced outcomes
fn setup_app(validation_passes: bool, edap_accepts: bool) -> axum::Router {
    let config = ServiceConfig::without_delays();
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::seeded().expect("seed store"));
    let edap = EdapConnector::new(
        Duration::ZERO,
        Duration::ZERO,
        Duration::ZERO,
        Arc::new(FixedOutcome(edap_accepts)),
    );
    let state = AppState::with_validation_outcome(
        &config,
        store,
        Arc::new(FixedOutcome(validation_passes)),
    )
    .with_edap(edap);
    build_router(state)
}

fn default_app() -> axum::Router {
    setup_app(true, true)
}

/// Test helper: issue a request and decode the JSON body
async fn make_request(
    app: &axum::Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(path);

    let request = if let Some(json_body) = body {
        request = request.header("content-type", "application/json");
        request.body(Body::from(json_body.to_string())).unwrap()
    } else {
        request.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let json_body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };

    (status, json_body)
}

fn ids(data: &Value) -> Vec<String> {
    data.as_array()
        .expect("data array")
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health / UI
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = default_app();
    let (status, body) = make_request(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "nfeasy-api");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_dashboard_is_served() {
    let app = default_app();
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("NF-easy"));
}

// =============================================================================
// Invoices
// =============================================================================

#[tokio::test]
async fn test_list_invoices_envelope() {
    let app = default_app();
    let (status, body) = make_request(&app, Method::GET, "/api/invoices", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 3);
    assert!(body["timestamp"].is_string());
    assert_eq!(ids(&body["data"]), vec!["INV001", "INV002", "INV003"]);
    assert_eq!(body["data"][0]["invoiceId"], "NF001-2024");
    assert_eq!(body["data"][0]["validationStatus"], "READING");
}

#[tokio::test]
async fn test_list_invoices_conjunctive_filters() {
    let app = default_app();

    let (_, body) = make_request(&app, Method::GET, "/api/invoices?status=ERROR&supplier=hydro", None).await;
    assert_eq!(ids(&body["data"]), vec!["INV003"]);

    let (_, body) = make_request(&app, Method::GET, "/api/invoices?status=ERROR&supplier=alcoa", None).await;
    assert_eq!(body["total"], 0);

    let (_, body) = make_request(&app, Method::GET, "/api/invoices?validationStatus=READY", None).await;
    assert_eq!(ids(&body["data"]), vec!["INV002"]);
}

#[tokio::test]
async fn test_get_invoice_not_found() {
    let app = default_app();
    let (status, body) = make_request(&app, Method::GET, "/api/invoices/does-not-exist", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "INVOICE_NOT_FOUND");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_validate_invoice_forced_pass() {
    let app = setup_app(true, true);
    let (status, body) = make_request(&app, Method::POST, "/api/invoices/INV003/validate", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Invoice validation completed");
    assert_eq!(body["data"]["status"], "VALIDATED");
    assert_eq!(body["data"]["validationStatus"], "READY");
    assert_eq!(body["data"]["divergences"], json!([]));

    let (_, body) = make_request(&app, Method::GET, "/api/invoices/INV003", None).await;
    assert_eq!(body["data"]["status"], "VALIDATED");
}

#[tokio::test]
async fn test_validate_invoice_forced_failure_is_success_response() {
    let app = setup_app(false, true);
    let (status, body) = make_request(&app, Method::POST, "/api/invoices/INV001/validate", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ERROR");
    assert_eq!(body["data"]["validationStatus"], "READY");
    let divergences = body["data"]["divergences"].as_array().unwrap();
    assert_eq!(divergences.len(), 1);
    assert_eq!(divergences[0]["type"], "VALIDATION_ERROR");
    assert_eq!(divergences[0]["status"], "PENDING");
}

#[tokio::test]
async fn test_validate_unknown_invoice() {
    let app = default_app();
    let (status, body) = make_request(&app, Method::POST, "/api/invoices/INV999/validate", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "INVOICE_NOT_FOUND");
}

#[tokio::test]
async fn test_update_invoice_status() {
    let app = default_app();
    let (status, body) = make_request(
        &app,
        Method::PATCH,
        "/api/invoices/INV001/status",
        Some(json!({ "status": "VALIDATED" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "VALIDATED");
    assert_eq!(body["message"], "Invoice status updated");
}

#[tokio::test]
async fn test_update_invoice_status_rejects_out_of_set_value() {
    let app = default_app();
    let (status, body) = make_request(
        &app,
        Method::PATCH,
        "/api/invoices/INV001/status",
        Some(json!({ "status": "SHIPPED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_STATUS");

    let (_, body) = make_request(&app, Method::GET, "/api/invoices/INV001", None).await;
    assert_eq!(body["data"]["status"], "PENDING_VALIDATION");
}

#[tokio::test]
async fn test_update_invoice_status_missing_field() {
    let app = default_app();
    let (status, body) = make_request(&app, Method::PATCH, "/api/invoices/INV001/status", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_INPUT");
}

// =============================================================================
// Workflows
// =============================================================================

#[tokio::test]
async fn test_list_workflows_filtered() {
    let app = default_app();
    let (_, body) = make_request(&app, Method::GET, "/api/workflows?status=DIVERGENCE_DETECTED", None).await;
    assert_eq!(ids(&body["data"]), vec!["WF001"]);

    let (_, body) = make_request(&app, Method::GET, "/api/workflows?supplier=BRASIL", None).await;
    assert_eq!(ids(&body["data"]), vec!["WF002"]);
}

#[tokio::test]
async fn test_resolve_divergences_one_by_one() {
    let app = default_app();

    let (status, body) = make_request(
        &app,
        Method::POST,
        "/api/workflows/WF001/resolve",
        Some(json!({ "divergenceId": "DIV001", "resolution": "XML regenerated" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "DIVERGENCE_DETECTED");
    assert!(body["data"]["resolvedAt"].is_null());
    assert_eq!(body["data"]["divergences"][0]["resolution"], "XML regenerated");

    let (status, body) = make_request(
        &app,
        Method::POST,
        "/api/workflows/WF001/resolve",
        Some(json!({ "divergenceId": "DIV002", "resolution": "CNPJ added" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Divergence resolved successfully");
    assert_eq!(body["data"]["status"], "RESOLVED");
    assert!(body["data"]["resolvedAt"].is_string());
}

#[tokio::test]
async fn test_resolve_missing_divergence_vs_missing_workflow() {
    let app = default_app();
    let payload = json!({ "divergenceId": "DIV999", "resolution": "n/a" });

    let (status, body) =
        make_request(&app, Method::POST, "/api/workflows/WF001/resolve", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "DIVERGENCE_NOT_FOUND");

    let (status, body) = make_request(&app, Method::POST, "/api/workflows/WF999/resolve", Some(payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "WORKFLOW_NOT_FOUND");
}

#[tokio::test]
async fn test_resolve_rejects_malformed_body() {
    let app = default_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/workflows/WF001/resolve")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_resolved_with_open_divergences() {
    let app = default_app();
    let (status, body) = make_request(&app, Method::PATCH, "/api/workflows/WF001/mark-resolved", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "RESOLVED");
    assert!(body["data"]["resolvedAt"].is_string());
    // Divergences stay open: force-resolve bypasses the per-divergence rule
    assert!(body["data"]["divergences"][0]["resolvedAt"].is_null());
    assert!(body["data"]["divergences"][1]["resolvedAt"].is_null());
}

#[tokio::test]
async fn test_overview_follows_transitions() {
    let app = default_app();

    let (status, body) = make_request(&app, Method::GET, "/api/workflows/stats/overview", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalWorkflows"], 3);
    assert_eq!(body["data"]["resolutionRate"], "33.3");

    // Idempotent read
    let (_, again) = make_request(&app, Method::GET, "/api/workflows/stats/overview", None).await;
    assert_eq!(again["data"], body["data"]);

    make_request(
        &app,
        Method::POST,
        "/api/workflows/WF001/resolve",
        Some(json!({ "divergenceId": "DIV001", "resolution": "ok" })),
    )
    .await;

    let (_, body) = make_request(&app, Method::GET, "/api/workflows/stats/overview", None).await;
    assert_eq!(body["data"]["resolvedDivergences"], 2);
    assert_eq!(body["data"]["resolutionRate"], "66.7");
    assert_eq!(body["data"]["divergenceDetected"], 1);
}

// =============================================================================
// EBS simulator
// =============================================================================

#[tokio::test]
async fn test_ebs_connection_and_data() {
    let app = default_app();

    let (status, body) = make_request(&app, Method::GET, "/api/ebs/test-connection", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CONNECTED");

    let (_, body) = make_request(&app, Method::GET, "/api/ebs/data?status=valid", None).await;
    assert_eq!(body["total"], 2); // "Pending Validation" and "Validated"

    let (_, body) = make_request(&app, Method::GET, "/api/ebs/data/3", None).await;
    assert_eq!(body["data"]["supplier"], "Hydro Alunorte");

    let (status, body) = make_request(&app, Method::GET, "/api/ebs/data/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "EBS_RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_ebs_post_data() {
    let app = default_app();
    let (status, body) = make_request(
        &app,
        Method::POST,
        "/api/ebs/post-data",
        Some(json!({ "invoiceId": "NF002-2024", "action": "POST_INVOICE", "data": {} })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert!(body["data"]["transactionId"].as_str().unwrap().starts_with("TXN-"));
}

// =============================================================================
// EDAP simulator
// =============================================================================

#[tokio::test]
async fn test_edap_send_accepted() {
    let app = setup_app(true, true);
    let (status, body) = make_request(
        &app,
        Method::POST,
        "/api/edap/send",
        Some(json!({ "invoiceData": { "invoiceId": "NF001-2024" }, "action": "SEND" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "SUCCESS");
    assert!(body["data"]["sefazProtocol"].as_str().unwrap().starts_with("SEFAZ-"));
}

#[tokio::test]
async fn test_edap_send_rejected() {
    let app = setup_app(true, false);
    let (status, body) = make_request(
        &app,
        Method::POST,
        "/api/edap/send",
        Some(json!({ "invoiceData": { "invoiceId": "NF001-2024" } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "EDAP processing failed");
    assert_eq!(body["errors"], json!(["Invalid XML format", "Missing required fields"]));
    assert_eq!(body["data"]["status"], "ERROR");
}

#[tokio::test]
async fn test_edap_send_without_invoice_id() {
    let app = default_app();
    let (status, body) = make_request(&app, Method::POST, "/api/edap/send", Some(json!({ "action": "SEND" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_edap_status_and_responses() {
    let app = default_app();

    let (_, body) = make_request(&app, Method::GET, "/api/edap/status/NF003-2024", None).await;
    assert_eq!(body["data"]["status"], "ERROR");
    assert_eq!(body["data"]["errors"][0], "Invalid CNPJ format");

    let (status, body) = make_request(&app, Method::GET, "/api/edap/status/NF999-2024", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "EDAP_RECORD_NOT_FOUND");

    let (_, body) = make_request(&app, Method::GET, "/api/edap/responses?limit=1", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 3);

    let (status, _) = make_request(&app, Method::GET, "/api/edap/responses?limit=many", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edap_manifestation() {
    let app = default_app();
    let (status, body) = make_request(
        &app,
        Method::POST,
        "/api/edap/manifestation",
        Some(json!({ "invoiceId": "NF002-2024", "manifestationType": "CONFIRMACAO" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Manifestation CONFIRMACAO processed successfully");
    assert_eq!(body["data"]["status"], "PROCESSED");
}

#[tokio::test]
async fn test_edap_manifestation_without_type() {
    let app = default_app();
    let (status, body) = make_request(
        &app,
        Method::POST,
        "/api/edap/manifestation",
        Some(json!({ "invoiceId": "NF002-2024" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "INVALID_INPUT");
}
