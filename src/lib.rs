//! Cluster Cache - one bounded TTL cache shared by a group of processes
//!
//! A single coordinator process owns the store. Worker processes reach it
//! through client proxies that exchange correlated request/reply messages
//! over the group transport, with namespaces isolating unrelated callers.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod host;
pub mod models;
pub mod namespace;
pub mod protocol;
pub mod transport;

pub use api::AppState;
pub use client::CacheClient;
pub use config::{ClientConfig, CoordinatorConfig, GatewayConfig};
pub use coordinator::Coordinator;
pub use error::{CacheError, Result};
pub use host::HostProcess;
pub use transport::{LocalGroup, Transport};
