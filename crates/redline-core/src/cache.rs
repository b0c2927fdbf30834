//! Ephemeral content cache.
//!
//! Bridges the free preview and the paid upgrade: a submission is stored
//! under a fresh [`ContentHandle`] and kept only long enough for the caller
//! to complete checkout. There is no background scheduler; write paths call
//! [`ContentCache::sweep`] opportunistically.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::ids::ContentHandle;

/// Default time-to-live for cached submissions, in hours.
pub const DEFAULT_TTL_HOURS: i64 = 2;

#[derive(Debug, Clone)]
struct ContentRecord {
    text: String,
    created_at: DateTime<Utc>,
}

/// Time-bounded store mapping an opaque handle to submitted text.
#[derive(Debug)]
pub struct ContentCache {
    ttl: Duration,
    entries: Mutex<HashMap<ContentHandle, ContentRecord>>,
}

impl ContentCache {
    /// Create a cache with the given time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a submission and return a fresh handle for it.
    ///
    /// Content semantics are the pipeline's concern; any string is accepted.
    #[must_use]
    pub fn put(&self, text: String) -> ContentHandle {
        self.put_at(text, Utc::now())
    }

    /// Clock-injected variant of [`put`](Self::put).
    #[must_use]
    pub fn put_at(&self, text: String, now: DateTime<Utc>) -> ContentHandle {
        let handle = ContentHandle::generate();
        self.entries.lock().insert(
            handle,
            ContentRecord {
                text,
                created_at: now,
            },
        );
        handle
    }

    /// Retrieve a submission by handle.
    ///
    /// Read-only and side-effect-free; a miss (unknown handle or expired
    /// record) is a normal outcome, not an error. Expired records are
    /// reported as misses even before a sweep has removed them, so retries
    /// can never observe content past its TTL.
    #[must_use]
    pub fn get(&self, handle: &ContentHandle) -> Option<String> {
        self.get_at(handle, Utc::now())
    }

    /// Clock-injected variant of [`get`](Self::get).
    #[must_use]
    pub fn get_at(&self, handle: &ContentHandle, now: DateTime<Utc>) -> Option<String> {
        let entries = self.entries.lock();
        let record = entries.get(handle)?;
        if now - record.created_at >= self.ttl {
            return None;
        }
        Some(record.text.clone())
    }

    /// Remove every record older than the TTL. Returns how many were removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, record| now - record.created_at < self.ttl);
        before - entries.len()
    }

    /// Number of records currently held (expired-but-unswept included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_TTL_HOURS))
    }
}
