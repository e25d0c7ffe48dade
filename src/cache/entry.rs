//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Size charged against the store's size bound (serialized bytes)
    pub size: usize,
    /// Timestamp of the last age reset (Unix milliseconds)
    pub updated_at: u64,
    /// TTL in milliseconds, None = no expiration
    pub ttl_ms: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `size` - The value's size in bytes
    /// * `ttl_ms` - Optional TTL in milliseconds
    pub fn new(value: Value, size: usize, ttl_ms: Option<u64>) -> Self {
        Self {
            value,
            size,
            updated_at: current_timestamp_ms(),
            ttl_ms,
        }
    }

    // == Expires At ==
    /// Expiration timestamp (Unix milliseconds), None if the entry never expires.
    pub fn expires_at(&self) -> Option<u64> {
        self.ttl_ms.map(|ttl| self.updated_at.saturating_add(ttl))
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Reset Age ==
    /// Restarts the TTL countdown from now.
    pub fn reset_age(&mut self) {
        self.updated_at = current_timestamp_ms();
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at()
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
