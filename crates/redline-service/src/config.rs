//! Service configuration.

use serde::Deserialize;
use std::path::Path;

use redline_core::PricingConfig;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Public base URL used for checkout redirect targets.
    pub base_url: String,

    /// Shared secret gating the operator status endpoint.
    pub admin_token: String,

    /// Operator address for payment notifications (optional).
    pub admin_email: Option<String>,

    /// From-address for outbound mail.
    pub from_email: String,

    /// Anthropic API key for the generation collaborator (optional).
    pub anthropic_api_key: Option<String>,

    /// Model used for the quick free-tier assessment.
    pub score_model: String,

    /// Model used for the paid full rewrite.
    pub rewrite_model: String,

    /// Stripe API key for the payment collaborator (optional).
    pub stripe_api_key: Option<String>,

    /// MailerSend API key for the email collaborator (optional).
    pub mailersend_api_key: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Free reviews allowed per caller per rolling day.
    pub free_reviews_per_day: u32,

    /// Hours a cached submission stays retrievable.
    pub content_ttl_hours: i64,

    /// Pricing configuration.
    pub pricing: PricingConfig,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    api_key: String,
}

/// Anthropic secrets file structure.
#[derive(Debug, Deserialize)]
struct AnthropicSecrets {
    api_key: String,
}

/// MailerSend secrets file structure.
#[derive(Debug, Deserialize)]
struct MailerSecrets {
    api_key: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        // Try to load collaborator secrets from files first, then fall
        // back to env vars
        let stripe_api_key = load_secret::<StripeSecrets>("stripe", "STRIPE_API_KEY", |s| s.api_key);
        let anthropic_api_key =
            load_secret::<AnthropicSecrets>("anthropic", "ANTHROPIC_API_KEY", |s| s.api_key);
        let mailersend_api_key =
            load_secret::<MailerSecrets>("mailersend", "MAILERSEND_API_KEY", |s| s.api_key);

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            base_url: std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
            admin_token: std::env::var("ADMIN_TOKEN").unwrap_or_else(|_| "change-me-in-prod".into()),
            admin_email: std::env::var("ADMIN_EMAIL").ok(),
            from_email: std::env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "reviews@redline.example".into()),
            anthropic_api_key,
            score_model: std::env::var("SCORE_MODEL")
                .unwrap_or_else(|_| "claude-haiku-4-5-20251001".into()),
            rewrite_model: std::env::var("REWRITE_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-5-20250929".into()),
            stripe_api_key,
            mailersend_api_key,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(256 * 1024), // 256KB; submissions are text-only
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(90),
            free_reviews_per_day: std::env::var("FREE_REVIEWS_PER_DAY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redline_core::DEFAULT_FREE_REVIEWS_PER_WINDOW),
            content_ttl_hours: std::env::var("CONTENT_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redline_core::DEFAULT_TTL_HOURS),
            pricing: PricingConfig::default(),
        }
    }
}

/// Load one collaborator secret from file or environment.
fn load_secret<T: serde::de::DeserializeOwned>(
    name: &str,
    env_var: &str,
    extract: impl Fn(T) -> String,
) -> Option<String> {
    // Try multiple paths for the secrets file
    let secret_paths = [
        format!(".secrets/{name}.json"),
        format!("redline/.secrets/{name}.json"),
        format!("../.secrets/{name}.json"),
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<T>(path) {
            tracing::info!(path = %path, "Loaded {name} secrets from file");
            return Some(extract(secrets));
        }
    }

    // Fall back to environment variables
    tracing::debug!("{name} secrets file not found, using environment variables");
    std::env::var(env_var).ok()
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            base_url: "http://localhost:8080".into(),
            admin_token: "change-me-in-prod".into(),
            admin_email: None,
            from_email: "reviews@redline.example".into(),
            anthropic_api_key: None,
            score_model: "claude-haiku-4-5-20251001".into(),
            rewrite_model: "claude-sonnet-4-5-20250929".into(),
            stripe_api_key: None,
            mailersend_api_key: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 256 * 1024,
            request_timeout_seconds: 90,
            free_reviews_per_day: redline_core::DEFAULT_FREE_REVIEWS_PER_WINDOW,
            content_ttl_hours: redline_core::DEFAULT_TTL_HOURS,
            pricing: PricingConfig::default(),
        }
    }
}
