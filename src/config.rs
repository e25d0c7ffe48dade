//! Configuration Module
//!
//! Coordinator, client and gateway settings. The coordinator and gateway
//! settings can be loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::StoreLimits;
use crate::protocol::RequestOptions;

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

// == Coordinator Config ==
/// Store bounds and housekeeping for the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Maximum number of entries
    pub max_entries: Option<usize>,
    /// Maximum total size in bytes
    pub max_size: Option<usize>,
    /// TTL in milliseconds for writes without one
    pub default_ttl_ms: Option<u64>,
    /// Interval in seconds between expired-entry purges
    pub purge_interval_secs: u64,
}

impl CoordinatorConfig {
    /// Loads the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `MAX_SIZE` - Maximum total size in bytes (default: unbounded)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `PURGE_INTERVAL` - Purge frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_parse("MAX_ENTRIES").or(defaults.max_entries),
            max_size: env_parse("MAX_SIZE").or(defaults.max_size),
            default_ttl_ms: env_parse("DEFAULT_TTL_MS").or(defaults.default_ttl_ms),
            purge_interval_secs: env_parse("PURGE_INTERVAL")
                .unwrap_or(defaults.purge_interval_secs),
        }
    }

    pub fn limits(&self) -> StoreLimits {
        StoreLimits {
            max_entries: self.max_entries,
            max_size: self.max_size,
            default_ttl_ms: self.default_ttl_ms,
        }
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs.max(1))
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_entries: Some(1000),
            max_size: None,
            default_ttl_ms: Some(300_000),
            purge_interval_secs: 1,
        }
    }
}

// == Client Config ==
/// Settings of a client proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Namespace for all keys; the client's own id when None
    pub namespace: Option<String>,
    /// Whether per-call option overrides are honoured
    pub allow_overrides: bool,
    /// Time to wait for a reply, in milliseconds
    pub request_timeout_ms: u64,
    /// Options sent with every get and set
    pub request_options: RequestOptions,
}

impl ClientConfig {
    /// Default configuration sharing `namespace`.
    pub fn shared(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            allow_overrides: false,
            request_timeout_ms: 300,
            request_options: RequestOptions::default(),
        }
    }
}

// == Gateway Config ==
/// Settings of the HTTP gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// HTTP server port
    pub server_port: u16,
    /// Reply timeout for gateway clients, in milliseconds
    pub request_timeout_ms: u64,
    /// Whether a `ttl` in a set body is honoured
    pub allow_overrides: bool,
}

impl GatewayConfig {
    /// Loads the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REQUEST_TIMEOUT_MS` - Reply timeout (default: 300)
    /// - `ALLOW_OVERRIDES` - Honour per-request TTLs (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            allow_overrides: env_parse("ALLOW_OVERRIDES").unwrap_or(defaults.allow_overrides),
        }
    }

    /// Client configuration for requests against `namespace`.
    pub fn client_config(&self, namespace: &str) -> ClientConfig {
        ClientConfig {
            namespace: Some(namespace.to_string()),
            allow_overrides: self.allow_overrides,
            request_timeout_ms: self.request_timeout_ms,
            request_options: RequestOptions::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            request_timeout_ms: 300,
            allow_overrides: true,
        }
    }
}
