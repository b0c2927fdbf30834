//! Error types for the review core.

/// Result type for review-core operations.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Errors that can occur in the review core.
///
/// Every variant maps onto one kind in the pipeline error taxonomy; the
/// service layer decides per kind whether to reject, degrade, or release a
/// fulfillment claim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    /// Submission below the useful-feedback floor.
    #[error("submission too short: {len} chars (minimum {min})")]
    TextTooShort {
        /// Actual length in characters.
        len: usize,
        /// Configured minimum.
        min: usize,
    },

    /// Submission above the cost-control ceiling.
    #[error("submission too long: {len} chars (maximum {max})")]
    TextTooLong {
        /// Actual length in characters.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Generation collaborator output did not parse into the expected shape.
    #[error("generation output malformed: {0}")]
    MalformedGeneration(String),
}
