//! Client SDK for the redline document-review service.
//!
//! Provides a typed async client over the service's HTTP API:
//!
//! - [`RedlineClient::submit_review`] - run a free review
//! - [`RedlineClient::create_checkout`] - open a payment session
//! - [`RedlineClient::request_upgrade`] - fulfill a paid upgrade
//! - [`RedlineClient::health`] - liveness check
//!
//! Service error envelopes are mapped onto [`ClientError`] variants so
//! callers can match on quota, duplicate-fulfillment, and expiry outcomes
//! without string-comparing messages.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientOptions, RedlineClient};
pub use error::ClientError;
pub use types::{
    CheckoutParams, CheckoutResponse, HealthResponse, ReviewResponse, SocialProofResponse,
    UpgradeParams, UpgradeResponse,
};
