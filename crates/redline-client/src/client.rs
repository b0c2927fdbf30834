//! Redline HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use serde_json::json;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, CheckoutParams, CheckoutResponse, HealthResponse, ReviewResponse,
    SocialProofResponse, UpgradeParams, UpgradeResponse,
};

/// Redline API client.
///
/// Provides methods for running reviews and driving the paid upgrade flow.
#[derive(Debug, Clone)]
pub struct RedlineClient {
    client: Client,
    base_url: String,
}

impl RedlineClient {
    /// Create a new redline client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the redline service (e.g., `"http://redline:8080"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new redline client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Submit a document for a free review.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an
    /// error; quota exhaustion maps to [`ClientError::QuotaExceeded`].
    pub async fn submit_review(&self, text: &str) -> Result<ReviewResponse, ClientError> {
        let url = format!("{}/api/review", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Open a checkout session for the full rewrite.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_checkout(
        &self,
        params: CheckoutParams,
    ) -> Result<CheckoutResponse, ClientError> {
        let url = format!("{}/api/checkout", self.base_url);

        let response = self.client.post(&url).json(&params).send().await?;

        self.handle_response(response).await
    }

    /// Fulfill a paid upgrade.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an
    /// error; replayed sessions map to [`ClientError::DuplicateFulfillment`]
    /// and expired submissions to [`ClientError::ContentExpired`].
    pub async fn request_upgrade(
        &self,
        params: UpgradeParams,
    ) -> Result<UpgradeResponse, ClientError> {
        let url = format!("{}/api/upgrade", self.base_url);

        let response = self.client.post(&url).json(&params).send().await?;

        self.handle_response(response).await
    }

    /// Fetch a recent score for social-proof display.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn social_proof(&self) -> Result<SocialProofResponse, ClientError> {
        let url = format!("{}/api/social-proof", self.base_url);

        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Check service health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        tracing::debug!(status = %status, "Service returned an error response");

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code;
                let message = api_error.error.message;

                // Map specific error codes to typed errors
                match code.as_str() {
                    "quota_exceeded" => Err(ClientError::QuotaExceeded { message }),
                    "payment_unverified" => Err(ClientError::PaymentUnverified { message }),
                    "duplicate_fulfillment" => Err(ClientError::DuplicateFulfillment { message }),
                    "content_expired" => Err(ClientError::ContentExpired { message }),
                    _ => Err(ClientError::Api {
                        code,
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 90, to cover rewrite latency).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 90,
        }
    }
}
