//! Core session and state-management types for redline.
//!
//! This crate provides the in-process state core that sits between the
//! untrusted client and the two expensive external operations (paid
//! generation calls and payment capture):
//!
//! - **Identifiers**: [`ContentHandle`], [`CallerKey`]
//! - **Admission**: [`AdmissionController`] — free-tier quota per caller
//! - **Cache**: [`ContentCache`] — TTL-bounded submission storage
//! - **Ledger**: [`FulfillmentLedger`] — payment idempotency guard
//! - **Metrics**: [`MetricsAggregator`] — daily operator counters
//! - **Review**: [`Assessment`], [`RewriteResult`] — generation-output parsing
//!
//! # Durability
//!
//! All state is in process memory by design; nothing survives a restart.
//! The ledger is the one structure where that matters for correctness —
//! see the module docs in [`ledger`].
//!
//! # Concurrency
//!
//! Every shared structure is guarded by a mutex held only for the map
//! operation itself. The ledger's check-and-insert is the single operation
//! that must be atomic rather than read-then-write.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod admission;
pub mod cache;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod metrics;
pub mod pricing;
pub mod review;

pub use admission::{AdmissionController, DEFAULT_FREE_REVIEWS_PER_WINDOW};
pub use cache::{ContentCache, DEFAULT_TTL_HOURS};
pub use error::{Result, ReviewError};
pub use ids::{CallerKey, ContentHandle, IdError};
pub use ledger::FulfillmentLedger;
pub use metrics::{DayCounters, MetricsAggregator, MetricsSnapshot, Totals};
pub use pricing::{PricePoint, PricingConfig};
pub use review::{
    Assessment, ExperienceEntry, ImprovementTip, RewriteResult, RewrittenDocument,
    MAX_TEXT_LEN, MIN_TEXT_LEN, SCORE_EXCERPT_CHARS,
};
