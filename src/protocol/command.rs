//! Cache commands
//!
//! The closed set of operations a client may ask the coordinator to run,
//! together with their typed arguments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::GetOptions;
use crate::error::{CacheError, Result};

// == Operation ==
/// Operation names as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Get,
    Set,
    Delete,
    Clear,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Delete => "delete",
            Operation::Clear => "clear",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get" => Ok(Operation::Get),
            "set" => Ok(Operation::Set),
            "delete" => Ok(Operation::Delete),
            "clear" => Ok(Operation::Clear),
            other => Err(CacheError::UnknownOperation(other.to_string())),
        }
    }
}

// == Request Options ==
/// Store options sent with get and set requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Serve an expired value instead of a miss
    pub allow_stale: bool,
    /// TTL in milliseconds applied by set
    pub ttl: u64,
    /// Restart an entry's TTL when it is read
    pub update_age_on_get: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            allow_stale: false,
            ttl: 300_000,
            update_age_on_get: true,
        }
    }
}

impl RequestOptions {
    /// Returns these options with every field set in `overrides` replaced.
    pub fn merged(self, overrides: &OptionOverrides) -> Self {
        Self {
            allow_stale: overrides.allow_stale.unwrap_or(self.allow_stale),
            ttl: overrides.ttl.unwrap_or(self.ttl),
            update_age_on_get: overrides
                .update_age_on_get
                .unwrap_or(self.update_age_on_get),
        }
    }

    pub fn get_options(&self) -> GetOptions {
        GetOptions {
            allow_stale: self.allow_stale,
            update_age_on_get: self.update_age_on_get,
        }
    }
}

/// Per-call replacements for a client's configured request options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionOverrides {
    pub allow_stale: Option<bool>,
    pub ttl: Option<u64>,
    pub update_age_on_get: Option<bool>,
}

impl OptionOverrides {
    pub fn ttl(ttl: u64) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    pub fn allow_stale(allow_stale: bool) -> Self {
        Self {
            allow_stale: Some(allow_stale),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allow_stale.is_none() && self.ttl.is_none() && self.update_age_on_get.is_none()
    }
}

// == Arguments ==
/// Arguments of get and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyArgs {
    pub key: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<RequestOptions>,
}

/// Arguments of set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetArgs {
    pub key: String,
    pub namespace: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<RequestOptions>,
}

/// Arguments of clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearArgs {
    pub namespace: String,
}

// == Command ==
/// A decoded request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get(KeyArgs),
    Set(SetArgs),
    Delete(KeyArgs),
    Clear(ClearArgs),
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::Get(_) => Operation::Get,
            Command::Set(_) => Operation::Set,
            Command::Delete(_) => Operation::Delete,
            Command::Clear(_) => Operation::Clear,
        }
    }

    /// Decodes the `args` of an operation.
    pub fn decode(operation: Operation, args: Value) -> Result<Self> {
        let invalid = |e: serde_json::Error| {
            CacheError::InvalidRequest(format!("bad {} arguments: {}", operation, e))
        };

        match operation {
            Operation::Get => serde_json::from_value(args).map(Command::Get),
            Operation::Set => serde_json::from_value(args).map(Command::Set),
            Operation::Delete => serde_json::from_value(args).map(Command::Delete),
            Operation::Clear => serde_json::from_value(args).map(Command::Clear),
        }
        .map_err(invalid)
    }

    /// Encodes the arguments for the wire.
    pub fn args(&self) -> Result<Value> {
        match self {
            Command::Get(args) | Command::Delete(args) => serde_json::to_value(args),
            Command::Set(args) => serde_json::to_value(args),
            Command::Clear(args) => serde_json::to_value(args),
        }
        .map_err(|e| CacheError::InvalidRequest(e.to_string()))
    }
}
