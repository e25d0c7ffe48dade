//! Cache Module
//!
//! The bounded in-memory store owned by the coordinator: capacity and size
//! bounds with LRU eviction, TTL expiration and optional stale reads.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{CacheStore, GetOptions, StoreLimits};
