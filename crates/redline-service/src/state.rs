//! Application state.
//!
//! The process-wide state container: the three shared structures of the
//! session core, the metrics aggregator, and the collaborator clients.
//! Initialized once at process start (or per test harness) and passed
//! explicitly; nothing here is reachable through ad-hoc global lookups.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::Rng;
use serde::Serialize;

use redline_core::{AdmissionController, ContentCache, FulfillmentLedger, MetricsAggregator};

use crate::config::ServiceConfig;
use crate::generation::{AnthropicClient, ReviewGenerator};
use crate::mailer::{MailDelivery, MailerSendClient};
use crate::payments::{PaymentGateway, StripeClient};

/// Bounds for the seeded social-proof scores.
const SEED_SCORE_RANGE: std::ops::RangeInclusive<u32> = 22..=58;

/// How many scores to seed at startup.
const SEED_SCORE_COUNT: usize = 10;

/// Timeout for the country-lookup call.
const GEO_TIMEOUT_SECONDS: u64 = 3;

/// An address captured through the mailing-list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedEmail {
    /// The address itself.
    pub email: String,
    /// Score the caller had at capture time.
    pub score: u32,
    /// When the capture happened.
    pub captured_at: DateTime<Utc>,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Free-tier quota enforcement.
    pub admission: Arc<AdmissionController>,

    /// Ephemeral submission storage.
    pub cache: Arc<ContentCache>,

    /// Payment idempotency guard.
    pub ledger: Arc<FulfillmentLedger>,

    /// Daily operator counters.
    pub metrics: Arc<MetricsAggregator>,

    /// Addresses captured through the mailing-list endpoint.
    pub captured_emails: Arc<Mutex<Vec<CapturedEmail>>>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Payment gateway (optional).
    pub payments: Option<Arc<dyn PaymentGateway>>,

    /// Generation backend (optional).
    pub generator: Option<Arc<dyn ReviewGenerator>>,

    /// Email delivery (optional).
    pub mailer: Option<Arc<dyn MailDelivery>>,

    /// Plain HTTP client for the country lookup.
    pub geo_http: reqwest::Client,
}

impl AppState {
    /// Create application state with the real collaborator clients.
    ///
    /// Each collaborator is enabled only when its key is configured; a
    /// missing key logs a warning and disables that feature.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let payments: Option<Arc<dyn PaymentGateway>> =
            config.stripe_api_key.as_ref().map(|key| {
                tracing::info!("Payment gateway integration enabled");
                Arc::new(StripeClient::new(key.clone())) as Arc<dyn PaymentGateway>
            });
        if payments.is_none() {
            tracing::warn!("Payments not configured - upgrades will not be available");
        }

        let generator: Option<Arc<dyn ReviewGenerator>> =
            config.anthropic_api_key.as_ref().map(|key| {
                tracing::info!(
                    score_model = %config.score_model,
                    rewrite_model = %config.rewrite_model,
                    "Generation integration enabled"
                );
                Arc::new(AnthropicClient::new(
                    key.clone(),
                    config.score_model.clone(),
                    config.rewrite_model.clone(),
                )) as Arc<dyn ReviewGenerator>
            });
        if generator.is_none() {
            tracing::warn!("Generation not configured - reviews will return degraded results");
        }

        let mailer: Option<Arc<dyn MailDelivery>> =
            config.mailersend_api_key.as_ref().map(|key| {
                tracing::info!("Mail delivery integration enabled");
                Arc::new(MailerSendClient::new(
                    key.clone(),
                    config.from_email.clone(),
                    config.admin_email.clone(),
                )) as Arc<dyn MailDelivery>
            });
        if mailer.is_none() {
            tracing::warn!("Mail not configured - results will not be emailed");
        }

        Self::with_collaborators(config, payments, generator, mailer)
    }

    /// Create application state with explicit collaborators.
    ///
    /// This is the constructor tests use to substitute stub collaborators
    /// for the network clients.
    #[must_use]
    pub fn with_collaborators(
        config: ServiceConfig,
        payments: Option<Arc<dyn PaymentGateway>>,
        generator: Option<Arc<dyn ReviewGenerator>>,
        mailer: Option<Arc<dyn MailDelivery>>,
    ) -> Self {
        let metrics = MetricsAggregator::new(Utc::now());

        // Give the proof endpoint plausible scores before real reviews
        // arrive; these never feed the reported average.
        let mut rng = rand::thread_rng();
        metrics.seed_social_proof((0..SEED_SCORE_COUNT).map(|_| rng.gen_range(SEED_SCORE_RANGE)));

        let geo_http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(GEO_TIMEOUT_SECONDS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            admission: Arc::new(AdmissionController::new(config.free_reviews_per_day)),
            cache: Arc::new(ContentCache::new(Duration::hours(config.content_ttl_hours))),
            ledger: Arc::new(FulfillmentLedger::new()),
            metrics: Arc::new(metrics),
            captured_emails: Arc::new(Mutex::new(Vec::new())),
            config,
            payments,
            generator,
            mailer,
            geo_http,
        }
    }
}
