//! Payment gateway integration.
//!
//! The gateway handles:
//! - Opening Checkout sessions for the one-time rewrite purchase
//! - Reporting session payment status (the upgrade pipeline verifies
//!   payment by pulling session status, not by consuming webhooks)
//!
//! The [`PaymentGateway`] trait is the seam the upgrade pipeline depends
//! on; [`StripeClient`] is the production implementation and tests
//! substitute a stub.

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::{PaymentError, StripeClient};
pub use types::{CheckoutSession, CreateCheckout, CustomerDetails};

/// Behavioral contract of the external payment collaborator.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a checkout session the caller can be redirected to.
    async fn create_checkout_session(
        &self,
        request: CreateCheckout,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Retrieve a session's current status by its reference.
    async fn get_checkout_session(&self, session_id: &str)
        -> Result<CheckoutSession, PaymentError>;
}
