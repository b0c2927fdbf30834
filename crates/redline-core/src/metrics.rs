//! Daily metrics aggregation.
//!
//! Append-only counters keyed by UTC day, read by the operator status view.
//! Counters are monotonic within a day and never mutated retroactively.
//! The aggregator also keeps a bounded rolling sample of recent scores used
//! for averaging and social-proof display; the sample is approximate and
//! non-durable by design.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::Rng;
use serde::Serialize;

/// How many scores the averaging sample retains.
const SCORE_SAMPLE_LEN: usize = 100;

/// How many scores the social-proof sample retains.
const RECENT_SAMPLE_LEN: usize = 20;

/// How many days the status snapshot breaks out individually.
const SNAPSHOT_DAYS: usize = 7;

/// Counters for a single UTC day.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DayCounters {
    /// Free reviews completed.
    pub free_reviews: u64,
    /// Checkout sessions opened.
    pub upgrades_started: u64,
    /// Paid upgrades fulfilled.
    pub upgrades_paid: u64,
    /// Revenue in minor currency units.
    pub revenue_minor_units: u64,
}

/// Process-lifetime totals.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Totals {
    /// Free reviews completed.
    pub free_reviews: u64,
    /// Checkout sessions opened.
    pub upgrades_started: u64,
    /// Paid upgrades fulfilled.
    pub upgrades_paid: u64,
    /// Revenue in minor currency units.
    pub revenue_minor_units: u64,
}

/// Read-only view served by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Today's counters.
    pub today: DayCounters,
    /// Process-lifetime totals.
    pub totals: Totals,
    /// Mean of the rolling score sample, one decimal.
    pub average_score: f64,
    /// Checkouts opened per free review, percent.
    pub upsell_rate_percent: f64,
    /// Paid upgrades per checkout opened, percent.
    pub conversion_rate_percent: f64,
    /// Per-day counters for the most recent days.
    pub daily: BTreeMap<String, DayCounters>,
    /// When this process started.
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    totals: Totals,
    daily: BTreeMap<String, DayCounters>,
    scores: VecDeque<u32>,
    recent: VecDeque<u32>,
}

/// Append-only counters keyed by day.
#[derive(Debug)]
pub struct MetricsAggregator {
    started_at: DateTime<Utc>,
    inner: Mutex<MetricsInner>,
}

fn day_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

impl MetricsAggregator {
    /// Create an aggregator stamped with the process start time.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            inner: Mutex::new(MetricsInner::default()),
        }
    }

    /// Record one completed free review.
    pub fn record_free_review(&self) {
        self.record_free_review_at(Utc::now());
    }

    /// Clock-injected variant of [`record_free_review`](Self::record_free_review).
    pub fn record_free_review_at(&self, now: DateTime<Utc>) {
        let mut inner = self.inner.lock();
        inner.totals.free_reviews += 1;
        inner.daily.entry(day_key(now)).or_default().free_reviews += 1;
    }

    /// Record one checkout session opened.
    pub fn record_upgrade_started(&self) {
        self.record_upgrade_started_at(Utc::now());
    }

    /// Clock-injected variant of [`record_upgrade_started`](Self::record_upgrade_started).
    pub fn record_upgrade_started_at(&self, now: DateTime<Utc>) {
        let mut inner = self.inner.lock();
        inner.totals.upgrades_started += 1;
        inner.daily.entry(day_key(now)).or_default().upgrades_started += 1;
    }

    /// Record one fulfilled paid upgrade and its transaction amount.
    pub fn record_upgrade_paid(&self, amount_minor_units: u64) {
        self.record_upgrade_paid_at(amount_minor_units, Utc::now());
    }

    /// Clock-injected variant of [`record_upgrade_paid`](Self::record_upgrade_paid).
    pub fn record_upgrade_paid_at(&self, amount_minor_units: u64, now: DateTime<Utc>) {
        let mut inner = self.inner.lock();
        inner.totals.upgrades_paid += 1;
        inner.totals.revenue_minor_units += amount_minor_units;
        let day = inner.daily.entry(day_key(now)).or_default();
        day.upgrades_paid += 1;
        day.revenue_minor_units += amount_minor_units;
    }

    /// Feed a review score into the rolling samples.
    pub fn push_score(&self, score: u32) {
        let mut inner = self.inner.lock();
        inner.scores.push_back(score);
        if inner.scores.len() > SCORE_SAMPLE_LEN {
            inner.scores.pop_front();
        }
        inner.recent.push_back(score);
        if inner.recent.len() > RECENT_SAMPLE_LEN {
            inner.recent.pop_front();
        }
    }

    /// Seed the social-proof sample without touching the averaging sample.
    ///
    /// Used at startup so the proof endpoint has something plausible to
    /// show before real reviews arrive; seeds never affect the reported
    /// average score.
    pub fn seed_social_proof(&self, scores: impl IntoIterator<Item = u32>) {
        let mut inner = self.inner.lock();
        for score in scores {
            inner.recent.push_back(score);
            if inner.recent.len() > RECENT_SAMPLE_LEN {
                inner.recent.pop_front();
            }
        }
    }

    /// Pick a random score from the social-proof sample.
    #[must_use]
    pub fn sample_recent_score(&self) -> Option<u32> {
        let inner = self.inner.lock();
        if inner.recent.is_empty() {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..inner.recent.len());
        inner.recent.get(idx).copied()
    }

    /// Build the operator-facing view.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot_at(Utc::now())
    }

    /// Clock-injected variant of [`snapshot`](Self::snapshot).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> MetricsSnapshot {
        let inner = self.inner.lock();

        let today = inner
            .daily
            .get(&day_key(now))
            .copied()
            .unwrap_or_default();

        let average_score = if inner.scores.is_empty() {
            0.0
        } else {
            let sum: u64 = inner.scores.iter().map(|&s| u64::from(s)).sum();
            round1(sum as f64 / inner.scores.len() as f64)
        };

        let upsell_rate_percent = percent(inner.totals.upgrades_started, inner.totals.free_reviews);
        let conversion_rate_percent =
            percent(inner.totals.upgrades_paid, inner.totals.upgrades_started);

        // Day keys sort lexicographically in date order, so the last N map
        // entries are the most recent days.
        let daily: BTreeMap<String, DayCounters> = inner
            .daily
            .iter()
            .rev()
            .take(SNAPSHOT_DAYS)
            .map(|(k, v)| (k.clone(), *v))
            .collect();

        MetricsSnapshot {
            today,
            totals: inner.totals,
            average_score,
            upsell_rate_percent,
            conversion_rate_percent,
            daily,
            started_at: self.started_at,
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        round1(numerator as f64 / denominator as f64 * 100.0)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
