//! Cache Store Module
//!
//! The bounded store owned by the coordinator: HashMap storage with LRU
//! tracking, entry-count and size bounds, and TTL expiration.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{CacheError, Result};

// == Store Limits ==
/// Bounds applied by the store. At least one must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreLimits {
    /// Maximum number of entries
    pub max_entries: Option<usize>,
    /// Maximum total size in bytes
    pub max_size: Option<usize>,
    /// TTL in milliseconds for writes that carry none
    pub default_ttl_ms: Option<u64>,
}

impl StoreLimits {
    /// Checks that the limits bound the store.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_entries must be positive".to_string(),
            ));
        }
        if self.max_size == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_size must be positive".to_string(),
            ));
        }

        let has_ttl = self.default_ttl_ms.is_some_and(|ttl| ttl > 0);
        if self.max_entries.is_none() && self.max_size.is_none() && !has_ttl {
            return Err(CacheError::InvalidConfig(
                "at least one of max_entries, max_size or default_ttl_ms is required".to_string(),
            ));
        }
        Ok(())
    }
}

// == Get Options ==
/// Per-lookup behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions {
    /// Return an expired value (once) instead of a miss
    pub allow_stale: bool,
    /// Restart the entry's TTL on a hit
    pub update_age_on_get: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            allow_stale: false,
            update_age_on_get: true,
        }
    }
}

// == Cache Store ==
/// Bounded key-value store with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    limits: StoreLimits,
    /// Sum of entry sizes
    size: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store after validating its limits.
    pub fn new(limits: StoreLimits) -> Result<Self> {
        limits.validate()?;
        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            limits,
            size: 0,
        })
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    // == Set ==
    /// Stores a value under `key`.
    ///
    /// An existing entry is replaced and its TTL restarted. Least recently used
    /// entries are evicted until the bounds hold. `ttl_ms` of None falls back to
    /// the default TTL; a TTL of zero means the entry never expires.
    pub fn set(&mut self, key: String, value: Value, ttl_ms: Option<u64>) -> Result<()> {
        let size = serde_json::to_vec(&value)
            .map_err(|e| CacheError::Store {
                key: key.clone(),
                reason: e.to_string(),
            })?
            .len();

        if let Some(max_size) = self.limits.max_size {
            if size > max_size {
                return Err(CacheError::Store {
                    key,
                    reason: format!("value size {} exceeds max size {}", size, max_size),
                });
            }
        }

        self.remove_entry(&key);

        while self.needs_room(size) {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    if let Some(entry) = self.entries.remove(&evicted) {
                        self.size -= entry.size;
                    }
                    self.stats.record_eviction();
                }
                None => break,
            }
        }

        let ttl = ttl_ms.or(self.limits.default_ttl_ms).filter(|ttl| *ttl > 0);
        self.entries
            .insert(key.clone(), CacheEntry::new(value, size, ttl));
        self.lru.touch(&key);
        self.size += size;

        Ok(())
    }

    // == Get ==
    /// Looks up `key`.
    ///
    /// Expired entries are removed; their value is returned only when
    /// `allow_stale` is set.
    pub fn get(&mut self, key: &str, options: GetOptions) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            let stale = self.remove_entry(key).map(|entry| entry.value);
            self.stats.record_expirations(1);
            if options.allow_stale {
                self.stats.record_hit();
                return stale;
            }
            self.stats.record_miss();
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        if options.update_age_on_get {
            entry.reset_age();
        }
        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Some(value)
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Keys ==
    /// Iterates over every stored key, expired or not.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.total_size = self.size;
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.size -= entry.size;
        Some(entry)
    }

    fn needs_room(&self, incoming: usize) -> bool {
        let entries_full = self
            .limits
            .max_entries
            .is_some_and(|max| self.entries.len() >= max);
        let size_full = self
            .limits
            .max_size
            .is_some_and(|max| self.size + incoming > max);
        entries_full || size_full
    }
}
