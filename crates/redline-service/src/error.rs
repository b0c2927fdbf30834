//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use redline_core::ReviewError;

/// API error type.
///
/// One variant per kind in the pipeline error taxonomy. Every failure a
/// handler can produce is translated into one of these at the pipeline
/// boundary; nothing propagates as an unhandled fault.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid operator credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request - invalid input, rejected before any side effect.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Free-tier quota exceeded for this caller's current window.
    #[error("daily free review limit reached")]
    QuotaExceeded,

    /// The payment gateway did not report the session as paid.
    #[error("payment not completed: {0}")]
    PaymentUnverified(String),

    /// This payment token has already been fulfilled.
    #[error("duplicate fulfillment: {0}")]
    DuplicateFulfillment(String),

    /// Cached content expired and no usable fallback was supplied.
    #[error("content expired")]
    ContentExpired,

    /// External collaborator failed or returned unusable output.
    #[error("external service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Self::QuotaExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                "quota_exceeded",
                "Daily free review limit reached. Upgrade to the full rewrite for more.".into(),
            ),
            Self::PaymentUnverified(msg) => (
                StatusCode::PAYMENT_REQUIRED,
                "payment_unverified",
                msg.clone(),
            ),
            Self::DuplicateFulfillment(token) => (
                StatusCode::CONFLICT,
                "duplicate_fulfillment",
                format!("Payment {token} has already been fulfilled. Check your email or refresh the page."),
            ),
            Self::ContentExpired => (
                StatusCode::GONE,
                "content_expired",
                "Submission expired. Please resubmit your document and try again.".into(),
            ),
            Self::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                msg.clone(),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::TextTooShort { .. } => {
                Self::BadRequest("Paste at least a few lines of your document.".into())
            }
            ReviewError::TextTooLong { .. } => {
                Self::BadRequest("Document is too long. Paste the text content only.".into())
            }
            ReviewError::MalformedGeneration(msg) => Self::ExternalService(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_errors_map_to_bad_request() {
        let err: ApiError = ReviewError::TextTooShort { len: 5, min: 80 }.into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = ReviewError::TextTooLong {
            len: 99_999,
            max: 15_000,
        }
        .into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
