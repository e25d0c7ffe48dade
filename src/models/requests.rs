//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming HTTP request bodies and path segments.

use serde::Deserialize;
use serde_json::Value;

/// Maximum allowed namespace or key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for the SET operation (PUT /ns/:namespace/:key)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The value to store
    pub value: Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

/// Path of a single-key operation.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyPath {
    pub namespace: String,
    pub key: String,
}

impl KeyPath {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        validate_namespace(&self.namespace)
    }
}

/// Returns an error message if the namespace is unusable.
pub fn validate_namespace(namespace: &str) -> Option<String> {
    if namespace.is_empty() {
        return Some("Namespace cannot be empty".to_string());
    }
    if namespace.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Namespace exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
