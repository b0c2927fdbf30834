//! Free-tier admission control.
//!
//! Each anonymous caller gets a fixed number of free reviews per rolling
//! 24-hour window, keyed by the caller's address digest. The window starts
//! at first use, not at a calendar boundary, and is replaced outright once
//! it has expired.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::ids::CallerKey;

/// Default number of free reviews per window.
pub const DEFAULT_FREE_REVIEWS_PER_WINDOW: u32 = 5;

/// Length of one quota window.
const WINDOW_HOURS: i64 = 24;

/// Per-caller quota record.
#[derive(Debug, Clone, Copy)]
struct QuotaWindow {
    count: u32,
    window_start: DateTime<Utc>,
}

/// Per-caller quota enforcement for the free tier.
///
/// A single in-process map guarded by a mutex; the lock is held only for
/// the map operation itself, never across any I/O.
#[derive(Debug)]
pub struct AdmissionController {
    ceiling: u32,
    windows: Mutex<HashMap<CallerKey, QuotaWindow>>,
}

impl AdmissionController {
    /// Create a controller with the given per-window ceiling.
    #[must_use]
    pub fn new(ceiling: u32) -> Self {
        Self {
            ceiling,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Decide whether this caller may run another free review now.
    #[must_use]
    pub fn admit(&self, key: &CallerKey) -> bool {
        self.admit_at(key, Utc::now())
    }

    /// Clock-injected variant of [`admit`](Self::admit).
    ///
    /// - No window yet: create one with `count = 1` and allow.
    /// - Window expired: replace it with a fresh one (a reset, not an
    ///   extension) and allow.
    /// - Window active and at the ceiling: deny without mutating state.
    /// - Otherwise: increment and allow.
    #[must_use]
    pub fn admit_at(&self, key: &CallerKey, now: DateTime<Utc>) -> bool {
        let mut windows = self.windows.lock();

        match windows.get_mut(key) {
            Some(window) => {
                if now - window.window_start >= Duration::hours(WINDOW_HOURS) {
                    *window = QuotaWindow {
                        count: 1,
                        window_start: now,
                    };
                    return true;
                }
                if window.count >= self.ceiling {
                    return false;
                }
                window.count += 1;
                true
            }
            None => {
                windows.insert(
                    key.clone(),
                    QuotaWindow {
                        count: 1,
                        window_start: now,
                    },
                );
                true
            }
        }
    }

    /// Number of callers currently tracked.
    #[must_use]
    pub fn tracked_callers(&self) -> usize {
        self.windows.lock().len()
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_REVIEWS_PER_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(addr: &str) -> CallerKey {
        CallerKey::from_addr(addr)
    }

    #[test]
    fn admits_up_to_ceiling_then_denies() {
        let controller = AdmissionController::new(5);
        let caller = key("203.0.113.7");
        let now = Utc::now();

        for _ in 0..5 {
            assert!(controller.admit_at(&caller, now));
        }
        assert!(!controller.admit_at(&caller, now));
    }

    #[test]
    fn denial_does_not_mutate_state() {
        let controller = AdmissionController::new(1);
        let caller = key("203.0.113.7");
        let start = Utc::now();

        assert!(controller.admit_at(&caller, start));
        assert!(!controller.admit_at(&caller, start));

        // The denied calls must not have moved the window start; the reset
        // still happens 24h after FIRST use.
        let just_after_expiry = start + Duration::hours(24);
        assert!(controller.admit_at(&caller, just_after_expiry));
    }

    #[test]
    fn window_resets_after_24_hours() {
        let controller = AdmissionController::new(5);
        let caller = key("203.0.113.7");
        let start = Utc::now();

        for _ in 0..5 {
            assert!(controller.admit_at(&caller, start));
        }
        assert!(!controller.admit_at(&caller, start + Duration::hours(23)));

        // Reset, not extension: the 6th call succeeds and starts a fresh
        // window with count = 1, so 4 more still fit.
        let later = start + Duration::hours(24);
        assert!(controller.admit_at(&caller, later));
        for _ in 0..4 {
            assert!(controller.admit_at(&caller, later));
        }
        assert!(!controller.admit_at(&caller, later));
    }

    #[test]
    fn callers_are_independent() {
        let controller = AdmissionController::new(1);
        let now = Utc::now();

        assert!(controller.admit_at(&key("203.0.113.7"), now));
        assert!(!controller.admit_at(&key("203.0.113.7"), now));
        assert!(controller.admit_at(&key("203.0.113.8"), now));
        assert_eq!(controller.tracked_callers(), 2);
    }
}
