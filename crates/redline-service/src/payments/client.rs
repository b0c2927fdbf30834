//! Stripe API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{CheckoutSession, CreateCheckout, GatewayErrorResponse};
use super::PaymentGateway;

/// Error type for payment gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway API returned an error.
    #[error("gateway API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_key: String,
}

impl StripeClient {
    /// Stripe API base URL.
    const BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Request timeout for gateway calls.
    const TIMEOUT_SECONDS: u64 = 30;

    /// Create a new Stripe client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<GatewayErrorResponse, _> = response.json().await;

        match error_body {
            Ok(gateway_error) => Err(PaymentError::Api {
                error_type: gateway_error.error.error_type,
                message: gateway_error.error.message,
                code: gateway_error.error.code,
            }),
            Err(_) => Err(PaymentError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    /// Create a Checkout session for the one-time rewrite purchase.
    async fn create_checkout_session(
        &self,
        request: CreateCheckout,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
            ("client_reference_id", request.client_reference_id.clone()),
            ("line_items[0][price_data][currency]", request.currency),
            (
                "line_items[0][price_data][product_data][name]",
                request.product_name,
            ),
            (
                "line_items[0][price_data][product_data][description]",
                request.product_description,
            ),
            (
                "line_items[0][price_data][unit_amount]",
                request.amount_minor_units.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
        ];

        tracing::debug!(
            client_reference_id = %request.client_reference_id,
            amount_minor_units = %request.amount_minor_units,
            "Creating Stripe checkout session"
        );

        let response = self
            .client
            .post(format!("{}/checkout/sessions", Self::BASE_URL))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Retrieve a Checkout session by ID.
    async fn get_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .client
            .get(format!("{}/checkout/sessions/{}", Self::BASE_URL, session_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
