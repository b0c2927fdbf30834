//! Caller-facing engagement endpoints: social proof, geo/pricing lookup,
//! and email capture.
//!
//! Nothing here participates in the review or upgrade pipelines; every
//! failure degrades to a harmless default.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use redline_core::Assessment;

use crate::error::ApiError;
use crate::state::{AppState, CapturedEmail};

/// Fallback country when the lookup fails or times out.
const FALLBACK_COUNTRY: &str = "US";

/// Score shown when the sample is somehow empty.
const FALLBACK_PROOF_SCORE: u32 = 42;

/// Social proof response.
#[derive(Debug, Serialize)]
pub struct SocialProofResponse {
    /// A recent (or seeded) review score.
    pub score: u32,
    /// How long ago it supposedly happened.
    pub minutes_ago: u32,
}

/// Return a random recent score for social-proof notifications.
pub async fn social_proof(State(state): State<Arc<AppState>>) -> Json<SocialProofResponse> {
    let score = state
        .metrics
        .sample_recent_score()
        .unwrap_or(FALLBACK_PROOF_SCORE);
    let minutes_ago = rand::thread_rng().gen_range(1..=15);
    Json(SocialProofResponse { score, minutes_ago })
}

/// Geo/pricing response.
#[derive(Debug, Serialize)]
pub struct GeoResponse {
    /// Detected (or fallback) ISO country code.
    pub country: String,
    /// Currency code for this country.
    pub currency: String,
    /// Currency symbol for display.
    pub symbol: String,
    /// Price in minor currency units.
    pub amount_minor_units: u64,
    /// Pre-formatted display price.
    pub display: String,
}

/// Detect the caller's country for currency selection.
pub async fn detect_geo(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<GeoResponse> {
    let addr = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .unwrap_or("")
        .to_string();

    let country = lookup_country(&state, &addr)
        .await
        .unwrap_or_else(|| FALLBACK_COUNTRY.into());
    let price = state.config.pricing.for_country(&country).clone();

    Json(GeoResponse {
        country,
        currency: price.currency,
        symbol: price.symbol,
        amount_minor_units: price.amount_minor_units,
        display: price.display,
    })
}

/// Look up the country for an address; `None` on any failure.
async fn lookup_country(state: &AppState, addr: &str) -> Option<String> {
    if addr.is_empty() {
        return None;
    }
    let url = format!("https://ipapi.co/{addr}/country/");
    let response = state.geo_http.get(&url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let text = response.text().await.ok()?;
    let country = text.trim().to_uppercase();
    (country.len() == 2).then_some(country)
}

/// Email capture request.
#[derive(Debug, Deserialize)]
pub struct CaptureEmailRequest {
    /// The address to capture.
    pub email: String,
    /// Score from the caller's free review.
    #[serde(default)]
    pub score: u32,
    /// Summary from the free review.
    #[serde(default)]
    pub summary: String,
    /// Critiques from the free review.
    #[serde(default)]
    pub critiques: Vec<String>,
}

/// Capture response.
#[derive(Debug, Serialize)]
pub struct CaptureEmailResponse {
    /// Always true on success; the results email is best-effort.
    pub ok: bool,
}

/// Capture a mailing-list address and send the review results to it.
pub async fn capture_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CaptureEmailRequest>,
) -> Result<Json<CaptureEmailResponse>, ApiError> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    state.captured_emails.lock().push(CapturedEmail {
        email: email.clone(),
        score: body.score,
        captured_at: Utc::now(),
    });

    // Results email is fire-and-forget; the capture already succeeded.
    if let Some(mailer) = state.mailer.clone() {
        let assessment = Assessment {
            score: body.score.min(100),
            critiques: body.critiques,
            summary: body.summary,
        };
        tokio::spawn(async move {
            if let Err(e) = mailer.send_assessment(&email, &assessment).await {
                tracing::debug!(error = %e, "Results email failed");
            }
        });
    }

    Ok(Json(CaptureEmailResponse { ok: true }))
}
