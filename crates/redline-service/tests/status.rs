//! Health and operator status endpoint integration tests.

mod common;

use common::{sample_document, TestHarness};
use serde_json::json;

#[tokio::test]
async fn health_check() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn stats_requires_token() {
    let harness = TestHarness::new();

    let response = harness.server.get("/admin/stats").await;
    response.assert_status_unauthorized();

    let response = harness.server.get("/admin/stats?token=wrong-token").await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn stats_reports_snapshot_and_sizes() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/api/review")
        .add_header("x-forwarded-for", "203.0.113.7")
        .json(&json!({ "text": sample_document() }))
        .await
        .assert_status_ok();

    let stats = harness.stats().await;
    assert_eq!(stats["totals"]["free_reviews"], 1);
    assert_eq!(stats["today"]["free_reviews"], 1);
    assert_eq!(stats["documents_cached"], 1);
    assert_eq!(stats["fulfillments_recorded"], 0);
    assert_eq!(stats["tracked_callers"], 1);
    assert!(stats["started_at"].as_str().is_some());
    assert!(stats["average_score"].as_f64().is_some());
}
