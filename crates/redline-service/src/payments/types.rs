//! Payment gateway API types.

use serde::Deserialize;

/// Parameters for opening a checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckout {
    /// Lowercase ISO currency code.
    pub currency: String,
    /// Amount in minor currency units.
    pub amount_minor_units: u64,
    /// Product name shown on the gateway's checkout page.
    pub product_name: String,
    /// Product description shown on the gateway's checkout page.
    pub product_description: String,
    /// Opaque reference carried through the session (the content handle).
    pub client_reference_id: String,
    /// URL to redirect to on success.
    pub success_url: String,
    /// URL to redirect to on cancel.
    pub cancel_url: String,
}

/// Checkout session object.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session ID; doubles as the fulfillment token.
    pub id: String,
    /// Checkout URL to redirect the user to.
    #[serde(default)]
    pub url: Option<String>,
    /// Payment status ("paid", "unpaid", "no_payment_required").
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Total amount in minor currency units.
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// Lowercase ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Client reference ID (our content handle).
    #[serde(default)]
    pub client_reference_id: Option<String>,
    /// Customer details collected by the gateway's checkout page.
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
}

impl CheckoutSession {
    /// Whether the gateway reports this session as paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }

    /// Contact address collected during checkout, if any.
    #[must_use]
    pub fn contact_address(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
    }
}

/// Customer details embedded in a checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    /// Email collected during checkout.
    #[serde(default)]
    pub email: Option<String>,
    /// Name collected during checkout.
    #[serde(default)]
    pub name: Option<String>,
}

/// Gateway error response envelope.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorResponse {
    /// The error payload.
    pub error: GatewayErrorBody,
}

/// Gateway error payload.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorBody {
    /// Error type.
    #[serde(rename = "type", default)]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_status_detection() {
        let session: CheckoutSession = serde_json::from_str(
            r#"{"id": "cs_test_1", "payment_status": "paid",
                "customer_details": {"email": "a@b.example"}}"#,
        )
        .unwrap();
        assert!(session.is_paid());
        assert_eq!(session.contact_address(), Some("a@b.example"));
    }

    #[test]
    fn unpaid_and_sparse_sessions_deserialize() {
        let session: CheckoutSession = serde_json::from_str(r#"{"id": "cs_test_2"}"#).unwrap();
        assert!(!session.is_paid());
        assert_eq!(session.contact_address(), None);
        assert_eq!(session.amount_total, None);
    }
}
