//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{engagement, health, review, status, upgrade};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /api/review` - Free-tier review (quota-limited per caller)
/// - `POST /api/checkout` - Open a payment session for the full rewrite
/// - `POST /api/upgrade` - Fulfill a paid upgrade
/// - `GET /api/social-proof` - Recent score for proof notifications
/// - `GET /api/geo` - Country detection for currency selection
/// - `POST /api/capture-email` - Mailing-list capture + results email
///
/// ## Operator (shared-secret token)
/// - `GET /admin/stats` - Metrics snapshot plus cache/ledger counts
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Review pipeline
        .route("/api/review", post(review::submit_review))
        // Upgrade pipeline
        .route("/api/checkout", post(upgrade::create_checkout))
        .route("/api/upgrade", post(upgrade::fulfill_upgrade))
        // Engagement
        .route("/api/social-proof", get(engagement::social_proof))
        .route("/api/geo", get(engagement::detect_geo))
        .route("/api/capture-email", post(engagement::capture_email))
        // Operator
        .route("/admin/stats", get(status::admin_stats))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
