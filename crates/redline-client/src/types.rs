//! Request and response types for the redline API.

use serde::{Deserialize, Serialize};

use redline_core::{ContentHandle, RewriteResult};

/// Free review response.
#[derive(Debug, Clone, Deserialize)]
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

/// Parameters for opening a checkout session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckoutParams {
    /// Handle from an earlier free review, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<ContentHandle>,
    /// Raw text fallback when no handle is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Requested currency; the service falls back to USD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Checkout creation response.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutResponse {
    /// Gateway URL to redirect the user to.
    pub checkout_url: String,
    /// Session reference for the later upgrade call.
    pub session_id: String,
    /// Handle the session was bound to.
    pub handle: ContentHandle,
}

/// Parameters for fulfilling a paid upgrade.
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeParams {
    /// The payment session reference from the success redirect.
    pub session_id: String,
    /// Handle for the cached submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<ContentHandle>,
    /// Raw text fallback if the cached submission expired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Upgrade fulfillment response.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeResponse {
    /// The full structured rewrite.
    #[serde(flatten)]
    pub result: RewriteResult,
    /// Whether the rewrite was also emailed to the payer.
    pub emailed: bool,
}

/// Social proof response.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialProofResponse {
    /// A recent review score.
    pub score: u32,
    /// How long ago it supposedly happened.
    pub minutes_ago: u32,
}

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// "ok" when the service is up.
    pub status: String,
    /// Server time.
    pub timestamp: String,
}

/// Service error envelope.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// The error payload.
    pub error: ApiErrorBody,
}

/// Service error payload.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
