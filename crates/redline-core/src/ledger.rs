//! Fulfillment ledger.
//!
//! A local idempotency guard layered on top of gateway-verified payment
//! tokens. Consuming a token and deciding to proceed with generation happen
//! as one atomic step; a claim is released only when the downstream
//! generation or delivery step fails, which preserves "at most one
//! successful fulfillment, unlimited retries until success".
//!
//! The set lives in process memory, so a restart forgets every consumed
//! token. Deployments with more than one instance, or with restarts during
//! active payment windows, need a durable store behind this same contract.

use std::collections::HashSet;

use parking_lot::Mutex;

/// Set of payment tokens already consumed by a fulfillment attempt.
#[derive(Debug, Default)]
pub struct FulfillmentLedger {
    consumed: Mutex<HashSet<String>>,
}

impl FulfillmentLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically record the token as consumed.
    ///
    /// Returns `true` if the token was *already* present, i.e. this is a
    /// duplicate fulfillment attempt and the caller must not proceed. The
    /// membership check and the insert are a single step under the lock;
    /// two concurrent calls with the same token can never both observe
    /// "not yet consumed".
    #[must_use]
    pub fn try_consume(&self, token: &str) -> bool {
        !self.consumed.lock().insert(token.to_owned())
    }

    /// Remove a token, re-opening the door for a legitimate retry.
    ///
    /// Called only when the generation/delivery step that followed the
    /// claim failed; never after a success.
    pub fn release(&self, token: &str) {
        self.consumed.lock().remove(token);
    }

    /// Number of tokens currently recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.consumed.lock().len()
    }

    /// Whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consumed.lock().is_empty()
    }
}
