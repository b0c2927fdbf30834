//! Operator status endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use redline_core::MetricsSnapshot;

use crate::crypto;
use crate::error::ApiError;
use crate::state::AppState;

/// Status query parameters.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Shared-secret token.
    #[serde(default)]
    pub token: Option<String>,
}

/// Status response: the metrics snapshot plus live size counts.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Aggregated counters and rates.
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
    /// Submissions currently cached.
    pub documents_cached: usize,
    /// Payment tokens currently recorded as fulfilled.
    pub fulfillments_recorded: usize,
    /// Caller identities with an active quota window.
    pub tracked_callers: usize,
    /// Addresses captured through the mailing-list endpoint.
    pub emails_captured: usize,
}

/// Serve the operator status view.
///
/// Gated by a shared-secret query token, compared in constant time.
/// Exposes no mutation capability.
pub async fn admin_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let token = query.token.as_deref().unwrap_or("");
    if !crypto::constant_time_eq(token, &state.config.admin_token) {
        return Err(ApiError::Unauthorized);
    }

    Ok(Json(StatsResponse {
        metrics: state.metrics.snapshot(),
        documents_cached: state.cache.len(),
        fulfillments_recorded: state.ledger.len(),
        tracked_callers: state.admission.tracked_callers(),
        emails_captured: state.captured_emails.lock().len(),
    }))
}
