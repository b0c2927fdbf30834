//! Checkout creation and paid-upgrade fulfillment.
//!
//! The fulfillment pipeline walks: verify -> claim -> generate -> deliver.
//! The claim is the linchpin: `try_consume` on the session token is the
//! sole defense against double fulfillment from webhook-style replays,
//! browser refreshes, and duplicate callbacks. Every failure path after a
//! successful claim releases it, so a payment is never stranded half done.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use redline_core::review;
use redline_core::{ContentHandle, RewriteResult};

use crate::error::ApiError;
use crate::payments::CreateCheckout;
use crate::state::AppState;

/// Checkout creation request.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Handle from an earlier free review, if the caller has one.
    #[serde(default)]
    pub handle: Option<ContentHandle>,
    /// Raw text fallback when no (live) handle is available.
    #[serde(default)]
    pub text: Option<String>,
    /// Requested currency; falls back to USD.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Checkout creation response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Gateway URL to redirect the caller to.
    pub checkout_url: String,
    /// Session reference for the later upgrade call.
    pub session_id: String,
    /// Handle the session was bound to.
    pub handle: ContentHandle,
}

/// Open a payment session for the full rewrite.
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let payments = state
        .payments
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Payments not configured".into()))?;

    // Re-cache when the handle is missing or already expired, so the paid
    // flow still has content to work from after the redirect round-trip.
    let handle = match body.handle.filter(|h| state.cache.get(h).is_some()) {
        Some(handle) => handle,
        None => {
            let text = body.text.as_deref().unwrap_or("").trim().to_string();
            review::validate_submission(&text)?;
            state.cache.put(text)
        }
    };

    let price = state
        .config
        .pricing
        .for_currency(body.currency.as_deref().unwrap_or("usd"))
        .clone();

    let success_url = format!(
        "{}/success?session_id={{CHECKOUT_SESSION_ID}}&handle={handle}",
        state.config.base_url
    );
    let cancel_url = format!("{}/#get-started", state.config.base_url);

    let session = payments
        .create_checkout_session(CreateCheckout {
            currency: price.currency.clone(),
            amount_minor_units: price.amount_minor_units,
            product_name: "Professional Document Rewrite".into(),
            product_description:
                "Complete rewrite with keyword optimization, achievement metrics, and professional formatting."
                    .into(),
            client_reference_id: handle.to_string(),
            success_url,
            cancel_url,
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create checkout session");
            ApiError::ExternalService("Payment setup failed. Please try again.".into())
        })?;

    let checkout_url = session
        .url
        .clone()
        .ok_or_else(|| ApiError::ExternalService("Gateway returned no checkout URL".into()))?;

    state.metrics.record_upgrade_started();

    tracing::info!(session_id = %session.id, handle = %handle, "Checkout session created");

    Ok(Json(CheckoutResponse {
        checkout_url,
        session_id: session.id,
        handle,
    }))
}

/// Upgrade fulfillment request.
#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    /// The payment session reference from the success redirect.
    pub session_id: String,
    /// Handle for the cached submission.
    #[serde(default)]
    pub handle: Option<ContentHandle>,
    /// Raw text fallback if the cached submission expired.
    #[serde(default)]
    pub text: Option<String>,
}

/// Upgrade fulfillment response.
#[derive(Debug, Serialize)]
pub struct UpgradeResponse {
    /// The full structured rewrite.
    #[serde(flatten)]
    pub result: RewriteResult,
    /// Whether the rewrite was also emailed to the payer.
    pub emailed: bool,
}

/// Fulfill a paid upgrade.
pub async fn fulfill_upgrade(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpgradeRequest>,
) -> Result<Json<UpgradeResponse>, ApiError> {
    let payments = state
        .payments
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Payments not configured".into()))?;
    let generator = state
        .generator
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Generation not configured".into()))?;

    // Verify with the gateway first; no local state is touched until the
    // session is known paid. No lock is held across this call.
    let session = payments
        .get_checkout_session(&body.session_id)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Could not verify payment session");
            ApiError::PaymentUnverified("Could not verify payment".into())
        })?;

    if !session.is_paid() {
        return Err(ApiError::PaymentUnverified("Payment not completed".into()));
    }

    // Claim the token. Check-and-insert is a single atomic step; two
    // concurrent requests with the same token cannot both pass here.
    let token = session.id.clone();
    if state.ledger.try_consume(&token) {
        return Err(ApiError::DuplicateFulfillment(token));
    }

    // Every failure path from here must release the claim.
    let Some(text) = resolve_content(&state, body.handle.as_ref(), body.text.as_deref()) else {
        state.ledger.release(&token);
        return Err(ApiError::ContentExpired);
    };

    let raw = match generator.rewrite_document(&text).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, token = %token, "Rewrite generation failed; claim released");
            state.ledger.release(&token);
            return Err(ApiError::ExternalService(
                "Rewrite generation failed. Please refresh to try again.".into(),
            ));
        }
    };

    let result = match RewriteResult::parse(&raw) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, token = %token, "Rewrite output malformed; claim released");
            state.ledger.release(&token);
            return Err(ApiError::ExternalService(
                "Rewrite generation failed. Please refresh to try again.".into(),
            ));
        }
    };

    // Generation succeeded: the claim stands from here on. Delivery is a
    // bonus channel; its failure must not roll anything back.
    let contact = session.contact_address().map(str::to_owned);
    let mut emailed = false;
    if let (Some(mailer), Some(to)) = (state.mailer.as_ref(), contact.as_deref()) {
        match mailer.send_rewrite(to, &result).await {
            Ok(()) => emailed = true,
            Err(e) => {
                tracing::warn!(error = %e, "Rewrite delivery failed; result still returned");
            }
        }
    }

    let amount = session
        .amount_total
        .and_then(|a| u64::try_from(a).ok())
        .unwrap_or_else(|| state.config.pricing.default_price().amount_minor_units);
    state.metrics.record_upgrade_paid(amount);

    notify_admin(&state, contact, session.currency.as_deref(), amount);

    tracing::info!(token = %token, emailed, "Paid upgrade fulfilled");

    Ok(Json(UpgradeResponse { result, emailed }))
}

/// Resolve the submission to rewrite.
///
/// Cache lookup by handle first; on a miss, caller-supplied raw text is
/// accepted if it would itself pass submission validation. (The raw-text
/// fallback is a deliberate trust-boundary trade-off; see DESIGN.md.)
fn resolve_content(
    state: &AppState,
    handle: Option<&ContentHandle>,
    fallback: Option<&str>,
) -> Option<String> {
    if let Some(text) = handle.and_then(|h| state.cache.get(h)) {
        return Some(text);
    }
    fallback
        .map(str::trim)
        .filter(|t| review::validate_submission(t).is_ok())
        .map(str::to_owned)
}

/// Fire-and-forget operator notification; never affects the response.
fn notify_admin(state: &AppState, contact: Option<String>, currency: Option<&str>, amount: u64) {
    let Some(mailer) = state.mailer.clone() else {
        return;
    };
    let customer = contact.unwrap_or_else(|| "unknown".into());
    let price = state.config.pricing.for_currency(currency.unwrap_or("usd"));
    #[allow(clippy::cast_precision_loss)]
    let amount_display = format!("{}{:.2}", price.symbol, amount as f64 / 100.0);

    tokio::spawn(async move {
        if let Err(e) = mailer.notify_admin_payment(&customer, &amount_display).await {
            tracing::debug!(error = %e, "Admin payment notification failed");
        }
    });
}
