//! Anthropic Messages API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompts;
use super::ReviewGenerator;

/// Error type for generation operations.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// HTTP request failed (including timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generation API returned an error status.
    #[error("generation API error: HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message body.
        message: String,
    },

    /// The response carried no text content.
    #[error("generation response contained no text")]
    EmptyResponse,
}

/// Anthropic Messages API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    score_model: String,
    rewrite_model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    block_type: String,
    #[serde(default)]
    text: String,
}

impl AnthropicClient {
    /// Messages API endpoint.
    const MESSAGES_URL: &'static str = "https://api.anthropic.com/v1/messages";

    /// API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    /// Request timeout for generation calls.
    ///
    /// The rewrite call is the latency-dominant operation in the whole
    /// service; a timeout here is handled upstream exactly like malformed
    /// output (degraded result on the free path, claim release on the paid
    /// path).
    const TIMEOUT_SECONDS: u64 = 60;

    /// Token budget for the quick assessment.
    const SCORE_MAX_TOKENS: u32 = 600;

    /// Token budget for the full rewrite.
    const REWRITE_MAX_TOKENS: u32 = 4096;

    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        score_model: impl Into<String>,
        rewrite_model: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            score_model: score_model.into(),
            rewrite_model: rewrite_model.into(),
        }
    }

    /// Send one prompt and return the concatenated text blocks.
    async fn complete(
        &self,
        model: &str,
        max_tokens: u32,
        prompt: &str,
    ) -> Result<String, GenerationError> {
        let request = MessagesRequest {
            model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(Self::MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: MessagesResponse = response.json().await?;
        let text: String = body
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect();

        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl ReviewGenerator for AnthropicClient {
    async fn score_document(&self, text: &str) -> Result<String, GenerationError> {
        self.complete(
            &self.score_model,
            Self::SCORE_MAX_TOKENS,
            &prompts::score_prompt(text),
        )
        .await
    }

    async fn rewrite_document(&self, text: &str) -> Result<String, GenerationError> {
        self.complete(
            &self.rewrite_model,
            Self::REWRITE_MAX_TOKENS,
            &prompts::rewrite_prompt(text),
        )
        .await
    }
}
