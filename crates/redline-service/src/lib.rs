//! Redline HTTP API Service.
//!
//! This crate provides the HTTP API for the redline document-review
//! service, including:
//!
//! - Free-tier review submission (quota-limited per anonymous caller)
//! - Checkout creation and paid-upgrade fulfillment
//! - Social-proof, geo/pricing, and email-capture endpoints
//! - Operator status endpoint
//!
//! # Collaborators
//!
//! The payment gateway, generation backend, and email delivery are
//! consumed through trait seams ([`payments::PaymentGateway`],
//! [`generation::ReviewGenerator`], [`mailer::MailDelivery`]) so the
//! pipelines can be exercised in tests without network access. Each is
//! optional at runtime; a missing configuration disables the feature with
//! a startup warning rather than failing the process.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async for consistency

pub mod config;
pub mod crypto;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod mailer;
pub mod payments;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use generation::{AnthropicClient, GenerationError, ReviewGenerator};
pub use mailer::{MailDelivery, MailError, MailerSendClient};
pub use payments::{CheckoutSession, PaymentError, PaymentGateway, StripeClient};
pub use routes::create_router;
pub use state::AppState;
