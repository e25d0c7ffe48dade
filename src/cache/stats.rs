//! Cache Statistics Module
//!
//! Tracks store and coordinator counters.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that found nothing (absent or expired)
    pub misses: u64,
    /// Entries evicted to respect the entry or size bound
    pub evictions: u64,
    /// Expired entries removed by lookups or purges
    pub expirations: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Current total size in bytes
    pub total_size: usize,
    /// Requests dispatched by the coordinator
    pub requests: u64,
    /// Requests answered with an error
    pub request_errors: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    /// Counts a dispatched request and whether it failed.
    pub fn record_request(&mut self, failed: bool) {
        self.requests += 1;
        if failed {
            self.request_errors += 1;
        }
    }
}
