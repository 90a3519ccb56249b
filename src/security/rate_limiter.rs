//! Fixed-window per-client request counter
//!
//! Time is cut into one-minute buckets (`now_ms / 60_000`). Each
//! `(client, bucket)` pair owns one atomic counter; a request is allowed while
//! the post-increment count stays within the ceiling. Stale buckets are swept
//! once per window rollover. Counters live only in memory, so a restart resets
//! every quota.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    constants::RATE_LIMIT_WINDOW_MS,
    utils::{Clock, SystemClock},
};

type BucketKey = (String, u64);

/// Injectable in-memory rate limiter
pub struct RateLimiter {
    ceiling: u64,
    counters: DashMap<BucketKey, AtomicU64>,
    /// Bucket of the last sweep
    swept_bucket: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a limiter backed by the system clock
    pub fn new(ceiling: u32) -> Self {
        Self::with_clock(ceiling, Arc::new(SystemClock))
    }

    pub fn with_clock(ceiling: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            ceiling: u64::from(ceiling),
            counters: DashMap::new(),
            swept_bucket: AtomicU64::new(u64::MAX),
            clock,
        }
    }

    /// Requests allowed per client per window
    pub fn ceiling(&self) -> u32 {
        self.ceiling as u32
    }

    /// Count one request for `client_id` and report whether it is within quota.
    ///
    /// Blank client ids are always rejected.
    pub fn allow(&self, client_id: &str) -> bool {
        if client_id.trim().is_empty() {
            return false;
        }

        let bucket = self.current_bucket();
        let count = {
            let counter = self
                .counters
                .entry((client_id.to_string(), bucket))
                .or_insert_with(|| AtomicU64::new(0));
            counter.fetch_add(1, Ordering::SeqCst) + 1
        };

        // The shard guard above must be released before retain() relocks it.
        if self.swept_bucket.swap(bucket, Ordering::SeqCst) != bucket {
            self.sweep(bucket);
        }

        count <= self.ceiling
    }

    /// Requests left for `client_id` in the current window
    pub fn remaining_quota(&self, client_id: &str) -> u32 {
        let key = (client_id.to_string(), self.current_bucket());
        match self.counters.get(&key) {
            Some(counter) => self
                .ceiling
                .saturating_sub(counter.load(Ordering::SeqCst)) as u32,
            None => self.ceiling as u32,
        }
    }

    /// Number of live counters (for diagnostics)
    pub fn tracked_keys(&self) -> usize {
        self.counters.len()
    }

    fn current_bucket(&self) -> u64 {
        self.clock.now_millis() / RATE_LIMIT_WINDOW_MS
    }

    /// Drop counters more than one bucket away from `current`.
    ///
    /// Races with concurrent increments can evict a counter early, which only
    /// loosens the limit for that client.
    fn sweep(&self, current: u64) {
        self.counters
            .retain(|(_, bucket), _| current.abs_diff(*bucket) <= 1);
    }
}
