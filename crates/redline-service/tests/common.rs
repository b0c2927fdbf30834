//! Common test utilities for redline integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;

use redline_core::{Assessment, RewriteResult};
use redline_service::payments::{CheckoutSession, CreateCheckout, CustomerDetails};
use redline_service::{
    create_router, AppState, GenerationError, MailDelivery, MailError, PaymentError,
    PaymentGateway, ReviewGenerator, ServiceConfig,
};

/// A valid quick-assessment payload the stub generator returns by default.
pub const VALID_SCORE_JSON: &str = r#"{
    "score": 48,
    "critiques": [
        "Bullet points describe duties, not outcomes.",
        "No metrics anywhere.",
        "The summary could belong to anyone.",
        "Key skills are conversational phrases.",
        "Formatting hints at a table-based layout."
    ],
    "summary": "Fixable, but right now this reads like a job description."
}"#;

/// A valid rewrite payload the stub generator returns by default.
pub const VALID_REWRITE_JSON: &str = r#"{
    "document": {
        "name": "A. Person",
        "title": "Operations Professional | 10+ Years",
        "location": "Springfield",
        "phone": "555-0100",
        "email": "a.person@example.com",
        "summary": "Reliable operations professional with a decade of experience.",
        "key_skills": ["Scheduling", "Vendor Management", "Inventory Control"],
        "certifications": ["First Aid", "Forklift Licence [Recommended]"],
        "references": "Available on request",
        "experience": [
            {
                "title": "Operations Lead",
                "company": "Acme, Springfield",
                "dates": "2019 - 2024",
                "bullets": ["Cut turnaround time by 30%", "Managed a team of 8"]
            }
        ]
    },
    "score_before": 34,
    "score_after": 78,
    "changes_made": ["Added metrics", "Rewrote summary", "Standardized skills"],
    "tips": [{"tip": "Add your certification dates", "why": "Only you know them"}]
}"#;

/// Submission text comfortably above the validation floor.
pub fn sample_document() -> String {
    "Operations lead with ten years of experience. Responsible for scheduling, \
     vendor management, and inventory control across three sites. Managed a team \
     of eight and handled daily logistics."
        .to_string()
}

/// Stub generation collaborator with scriptable responses and call counters.
pub struct StubGenerator {
    /// Raw text returned from `score_document`.
    pub score_response: Mutex<String>,
    /// Raw text returned from `rewrite_document`.
    pub rewrite_response: Mutex<String>,
    /// When set, both methods fail with a transport-style error.
    pub fail: AtomicBool,
    /// Number of `score_document` calls observed.
    pub score_calls: AtomicUsize,
    /// Number of `rewrite_document` calls observed.
    pub rewrite_calls: AtomicUsize,
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self {
            score_response: Mutex::new(VALID_SCORE_JSON.to_string()),
            rewrite_response: Mutex::new(VALID_REWRITE_JSON.to_string()),
            fail: AtomicBool::new(false),
            score_calls: AtomicUsize::new(0),
            rewrite_calls: AtomicUsize::new(0),
        }
    }
}

impl StubGenerator {
    pub fn set_score_response(&self, raw: &str) {
        *self.score_response.lock().unwrap() = raw.to_string();
    }

    pub fn set_rewrite_response(&self, raw: &str) {
        *self.rewrite_response.lock().unwrap() = raw.to_string();
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn score_calls(&self) -> usize {
        self.score_calls.load(Ordering::SeqCst)
    }

    pub fn rewrite_calls(&self) -> usize {
        self.rewrite_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewGenerator for StubGenerator {
    async fn score_document(&self, _text: &str) -> Result<String, GenerationError> {
        self.score_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(self.score_response.lock().unwrap().clone())
    }

    async fn rewrite_document(&self, _text: &str) -> Result<String, GenerationError> {
        self.rewrite_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(self.rewrite_response.lock().unwrap().clone())
    }
}

/// Stub payment gateway holding scripted checkout sessions.
#[derive(Default)]
pub struct StubGateway {
    sessions: Mutex<HashMap<String, CheckoutSession>>,
    created: AtomicUsize,
}

impl StubGateway {
    /// Script a session the upgrade pipeline will see as paid.
    pub fn insert_paid_session(&self, id: &str, email: Option<&str>) {
        self.insert_session(id, "paid", email);
    }

    /// Script a session with an arbitrary payment status.
    pub fn insert_session(&self, id: &str, payment_status: &str, email: Option<&str>) {
        let session = CheckoutSession {
            id: id.to_string(),
            url: None,
            payment_status: Some(payment_status.to_string()),
            amount_total: Some(499),
            currency: Some("usd".to_string()),
            client_reference_id: None,
            customer_details: email.map(|e| CustomerDetails {
                email: Some(e.to_string()),
                name: None,
            }),
        };
        self.sessions.lock().unwrap().insert(id.to_string(), session);
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_checkout_session(
        &self,
        request: CreateCheckout,
    ) -> Result<CheckoutSession, PaymentError> {
        let n = self.created.fetch_add(1, Ordering::SeqCst);
        let id = format!("cs_test_{n}");
        Ok(CheckoutSession {
            id: id.clone(),
            url: Some(format!("https://checkout.test/pay/{id}")),
            payment_status: Some("unpaid".to_string()),
            amount_total: Some(i64::try_from(request.amount_minor_units).unwrap_or(0)),
            currency: Some(request.currency),
            client_reference_id: Some(request.client_reference_id),
            customer_details: None,
        })
    }

    async fn get_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::Api {
                error_type: "invalid_request_error".to_string(),
                message: format!("No such checkout session: {session_id}"),
                code: Some("resource_missing".to_string()),
            })
    }
}

/// Stub mail collaborator with counters and a failure switch.
#[derive(Default)]
pub struct StubMailer {
    /// When set, every send fails.
    pub fail: AtomicBool,
    /// Rewrites delivered.
    pub rewrites_sent: AtomicUsize,
    /// Assessments delivered.
    pub assessments_sent: AtomicUsize,
    /// Admin notifications delivered.
    pub admin_notes_sent: AtomicUsize,
}

impl StubMailer {
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn rewrites_sent(&self) -> usize {
        self.rewrites_sent.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(MailError::Api { status: 500 })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MailDelivery for StubMailer {
    async fn send_rewrite(&self, _to: &str, _result: &RewriteResult) -> Result<(), MailError> {
        self.check()?;
        self.rewrites_sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_assessment(&self, _to: &str, _assessment: &Assessment) -> Result<(), MailError> {
        self.check()?;
        self.assessments_sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn notify_admin_payment(
        &self,
        _customer: &str,
        _amount_display: &str,
    ) -> Result<(), MailError> {
        self.check()?;
        self.admin_notes_sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The scriptable generation stub.
    pub generator: Arc<StubGenerator>,
    /// The scriptable payment stub.
    pub payments: Arc<StubGateway>,
    /// The scriptable mail stub.
    pub mailer: Arc<StubMailer>,
    /// The shared-secret token for the status endpoint.
    pub admin_token: String,
}

impl TestHarness {
    /// Create a new test harness with stubbed collaborators.
    pub fn new() -> Self {
        let admin_token = "test-admin-token".to_string();
        let config = ServiceConfig {
            admin_token: admin_token.clone(),
            ..ServiceConfig::default()
        };

        let generator = Arc::new(StubGenerator::default());
        let payments = Arc::new(StubGateway::default());
        let mailer = Arc::new(StubMailer::default());

        let state = AppState::with_collaborators(
            config,
            Some(Arc::clone(&payments) as Arc<dyn PaymentGateway>),
            Some(Arc::clone(&generator) as Arc<dyn ReviewGenerator>),
            Some(Arc::clone(&mailer) as Arc<dyn MailDelivery>),
        );
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            generator,
            payments,
            mailer,
            admin_token,
        }
    }

    /// Fetch the operator status snapshot.
    pub async fn stats(&self) -> serde_json::Value {
        let response = self
            .server
            .get(&format!("/admin/stats?token={}", self.admin_token))
            .await;
        response.assert_status_ok();
        response.json()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
