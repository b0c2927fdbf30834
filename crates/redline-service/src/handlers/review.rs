//! Free-tier review pipeline.
//!
//! One request walks: validate -> admit -> score -> cache -> respond.
//! Validation and admission failures short-circuit before any side effect;
//! scoring failures degrade rather than error, because the caller already
//! waited for a response.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use redline_core::review::{self, SCORE_EXCERPT_CHARS};
use redline_core::{Assessment, CallerKey, ContentHandle};

use crate::error::ApiError;
use crate::state::AppState;

/// Review submission request.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// The document text to review.
    pub text: String,
}

/// Review response.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    /// Overall score, 0-100.
    pub score: u32,
    /// Specific critique points.
    pub critiques: Vec<String>,
    /// One-line summary.
    pub summary: String,
    /// Handle for the cached submission, used to upgrade later.
    pub handle: ContentHandle,
}

/// Run the free review pipeline.
pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let text = body.text.trim().to_string();
    review::validate_submission(&text)?;

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok());
    let caller = CallerKey::from_forwarded(forwarded);

    if !state.admission.admit(&caller) {
        tracing::info!(caller = %caller, "Free review denied: quota exceeded");
        return Err(ApiError::QuotaExceeded);
    }

    let assessment = score_with_fallback(&state, &text).await;

    // Cache the original text regardless of score so the caller can
    // upgrade later; sweep opportunistically while we are on a write path.
    let handle = state.cache.put(text);
    let swept = state.cache.sweep(Utc::now());
    if swept > 0 {
        tracing::debug!(swept, "Swept expired submissions");
    }

    state.metrics.record_free_review();
    state.metrics.push_score(assessment.score);

    tracing::info!(score = assessment.score, handle = %handle, "Free review completed");

    Ok(Json(ReviewResponse {
        score: assessment.score,
        critiques: assessment.critiques,
        summary: assessment.summary,
        handle,
    }))
}

/// Score the submission, degrading on any upstream problem.
///
/// Timeouts, transport failures, and unparseable output all land on the
/// same canned assessment; none of them may fail the request.
async fn score_with_fallback(state: &AppState, text: &str) -> Assessment {
    let Some(generator) = state.generator.as_ref() else {
        tracing::warn!("Generation not configured; returning degraded assessment");
        return Assessment::degraded();
    };

    let excerpt: String = text.chars().take(SCORE_EXCERPT_CHARS).collect();
    match generator.score_document(&excerpt).await {
        Ok(raw) => Assessment::parse(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Assessment output malformed; degrading");
            Assessment::degraded()
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Assessment generation failed; degrading");
            Assessment::degraded()
        }
    }
}
