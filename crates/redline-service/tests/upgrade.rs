//! Checkout and paid-upgrade pipeline integration tests.

mod common;

use axum::http::StatusCode;
use common::{sample_document, TestHarness};
use serde_json::json;

async fn free_review_handle(harness: &TestHarness) -> String {
    let response = harness
        .server
        .post("/api/review")
        .add_header("x-forwarded-for", "203.0.113.7")
        .json(&json!({ "text": sample_document() }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["handle"].as_str().unwrap().to_string()
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn checkout_with_raw_text_creates_session() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/checkout")
        .json(&json!({ "text": sample_document(), "currency": "gbp" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["checkout_url"].as_str().unwrap().starts_with("https://"));
    assert!(body["session_id"].as_str().is_some());
    assert!(body["handle"].as_str().is_some());

    let stats = harness.stats().await;
    assert_eq!(stats["totals"]["upgrades_started"], 1);
    assert_eq!(stats["documents_cached"], 1);
}

#[tokio::test]
async fn checkout_reuses_live_handle() {
    let harness = TestHarness::new();
    let handle = free_review_handle(&harness).await;

    let response = harness
        .server
        .post("/api/checkout")
        .json(&json!({ "handle": handle }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["handle"].as_str().unwrap(), handle);

    // No second copy was cached.
    let stats = harness.stats().await;
    assert_eq!(stats["documents_cached"], 1);
}

#[tokio::test]
async fn checkout_without_content_fails() {
    let harness = TestHarness::new();

    let response = harness.server.post("/api/checkout").json(&json!({})).await;

    response.assert_status_bad_request();
    let stats = harness.stats().await;
    assert_eq!(stats["totals"]["upgrades_started"], 0);
}

// ============================================================================
// Upgrade: verification
// ============================================================================

#[tokio::test]
async fn unpaid_session_is_rejected_without_side_effects() {
    let harness = TestHarness::new();
    let handle = free_review_handle(&harness).await;
    harness
        .payments
        .insert_session("cs_test_unpaid", "unpaid", None);

    let response = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_unpaid", "handle": handle }))
        .await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    assert_eq!(harness.generator.rewrite_calls(), 0);

    let stats = harness.stats().await;
    assert_eq!(stats["fulfillments_recorded"], 0);
    assert_eq!(stats["totals"]["upgrades_paid"], 0);
}

#[tokio::test]
async fn unknown_session_is_rejected() {
    let harness = TestHarness::new();
    let handle = free_review_handle(&harness).await;

    let response = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_missing", "handle": handle }))
        .await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    assert_eq!(harness.generator.rewrite_calls(), 0);
}

// ============================================================================
// Upgrade: fulfillment
// ============================================================================

#[tokio::test]
async fn paid_upgrade_generates_delivers_and_records() {
    let harness = TestHarness::new();
    let handle = free_review_handle(&harness).await;
    harness
        .payments
        .insert_paid_session("cs_test_abc", Some("payer@example.com"));

    let response = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["document"]["name"], "A. Person");
    assert_eq!(body["score_after"], 78);
    assert_eq!(body["emailed"], true);

    assert_eq!(harness.generator.rewrite_calls(), 1);
    assert_eq!(harness.mailer.rewrites_sent(), 1);

    let stats = harness.stats().await;
    assert_eq!(stats["totals"]["upgrades_paid"], 1);
    assert_eq!(stats["totals"]["revenue_minor_units"], 499);
    assert_eq!(stats["fulfillments_recorded"], 1);
}

#[tokio::test]
async fn duplicate_upgrade_is_conflict_with_no_new_generation() {
    let harness = TestHarness::new();
    let handle = free_review_handle(&harness).await;
    harness
        .payments
        .insert_paid_session("cs_test_abc", Some("payer@example.com"));

    harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await
        .assert_status_ok();

    let replay = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await;

    replay.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = replay.json();
    assert_eq!(body["error"]["code"], "duplicate_fulfillment");

    // The existing fulfillment is authoritative: exactly one generation.
    assert_eq!(harness.generator.rewrite_calls(), 1);
    let stats = harness.stats().await;
    assert_eq!(stats["totals"]["upgrades_paid"], 1);
}

#[tokio::test]
async fn raw_text_fallback_fulfills_on_cache_miss() {
    let harness = TestHarness::new();
    harness
        .payments
        .insert_paid_session("cs_test_abc", Some("payer@example.com"));

    // No handle at all; only client-supplied text.
    let response = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "text": sample_document() }))
        .await;

    response.assert_status_ok();
    assert_eq!(harness.generator.rewrite_calls(), 1);
}

#[tokio::test]
async fn expired_content_releases_claim_for_retry() {
    let harness = TestHarness::new();
    harness
        .payments
        .insert_paid_session("cs_test_abc", Some("payer@example.com"));

    // Neither a live handle nor usable fallback text.
    let response = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "text": "tiny" }))
        .await;

    response.assert_status(StatusCode::GONE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "content_expired");
    assert_eq!(harness.generator.rewrite_calls(), 0);

    // The claim was released: resubmitting content lets the same payment
    // token fulfill.
    let retry = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "text": sample_document() }))
        .await;
    retry.assert_status_ok();
}

#[tokio::test]
async fn malformed_rewrite_releases_claim_for_retry() {
    let harness = TestHarness::new();
    let handle = free_review_handle(&harness).await;
    harness
        .payments
        .insert_paid_session("cs_test_abc", Some("payer@example.com"));

    harness
        .generator
        .set_rewrite_response("Here is your rewritten document as prose...");

    let response = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let stats = harness.stats().await;
    assert_eq!(stats["fulfillments_recorded"], 0);
    assert_eq!(stats["totals"]["upgrades_paid"], 0);

    // Fixed output on retry succeeds with the same token.
    harness
        .generator
        .set_rewrite_response(common::VALID_REWRITE_JSON);
    harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn generation_transport_failure_releases_claim() {
    let harness = TestHarness::new();
    let handle = free_review_handle(&harness).await;
    harness
        .payments
        .insert_paid_session("cs_test_abc", Some("payer@example.com"));

    harness.generator.set_fail(true);
    harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await
        .assert_status(StatusCode::BAD_GATEWAY);

    harness.generator.set_fail(false);
    harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn delivery_failure_does_not_roll_back_the_claim() {
    let harness = TestHarness::new();
    let handle = free_review_handle(&harness).await;
    harness
        .payments
        .insert_paid_session("cs_test_abc", Some("payer@example.com"));

    harness.mailer.set_fail(true);
    let response = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await;

    // The generation already succeeded; the result is still returned and
    // the fulfillment stands.
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["emailed"], false);

    let replay = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await;
    replay.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn upgrade_without_contact_skips_delivery() {
    let harness = TestHarness::new();
    let handle = free_review_handle(&harness).await;
    harness.payments.insert_paid_session("cs_test_abc", None);

    let response = harness
        .server
        .post("/api/upgrade")
        .json(&json!({ "session_id": "cs_test_abc", "handle": handle }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["emailed"], false);
    assert_eq!(harness.mailer.rewrites_sent(), 0);
}
