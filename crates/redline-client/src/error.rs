//! Client error types.

/// Errors returned by the redline client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Free-tier quota exhausted for this caller.
    #[error("quota exceeded: {message}")]
    QuotaExceeded {
        /// Service-provided message.
        message: String,
    },

    /// The payment session was not (yet) paid.
    #[error("payment not verified: {message}")]
    PaymentUnverified {
        /// Service-provided message.
        message: String,
    },

    /// This payment was already fulfilled.
    #[error("duplicate fulfillment: {message}")]
    DuplicateFulfillment {
        /// Service-provided message.
        message: String,
    },

    /// The cached submission expired; resubmit the text.
    #[error("content expired: {message}")]
    ContentExpired {
        /// Service-provided message.
        message: String,
    },

    /// Any other service error.
    #[error("API error ({status}): {code} - {message}")]
    Api {
        /// Stable machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
        /// HTTP status.
        status: u16,
    },
}
