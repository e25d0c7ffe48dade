//! Error types for the shared cache
//!
//! Provides unified error handling using thiserror.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::transport::Role;

// == Cache Error Enum ==
/// Unified error type for the coordinator, the client proxies and the gateway.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Component constructed in the wrong process role
    #[error("{component} cannot be constructed in the {role} role")]
    RoleViolation {
        component: &'static str,
        role: Role,
    },

    /// Operation name not recognized by the coordinator
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Key not present in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Malformed request arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Store rejected a write
    #[error("Store rejected '{key}': {reason}")]
    Store { key: String, reason: String },

    /// No reply arrived before the request timeout
    #[error("Request {request_id} from client {client_id} timed out")]
    Timeout {
        request_id: String,
        client_id: String,
    },

    /// Error forwarded from a coordinator reply
    #[error("Remote error: {0}")]
    Remote(ReplyError),

    /// Message could not be handed to the transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Wire code for errors that cross the protocol boundary.
    pub fn code(&self) -> ErrorCode {
        match self {
            CacheError::UnknownOperation(_) => ErrorCode::UnknownOperation,
            CacheError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            CacheError::Store { .. } => ErrorCode::Store,
            CacheError::Remote(err) => err.code,
            _ => ErrorCode::Internal,
        }
    }

    /// Converts the error into its reply payload.
    pub fn to_reply_error(&self) -> ReplyError {
        match self {
            CacheError::Remote(err) => err.clone(),
            other => ReplyError::new(other.code(), other.to_string()),
        }
    }
}

// == Reply Error ==
/// Error classification carried in a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    UnknownOperation,
    InvalidRequest,
    Store,
    Internal,
}

/// The `error` member of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyError {
    pub code: ErrorCode,
    pub message: String,
}

impl ReplyError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::UnknownOperation(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::Store { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Remote(err) => match err.code {
                ErrorCode::InvalidRequest | ErrorCode::UnknownOperation => StatusCode::BAD_REQUEST,
                ErrorCode::Store => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            CacheError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::RoleViolation { .. } | CacheError::InvalidConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the shared cache.
pub type Result<T> = std::result::Result<T, CacheError>;
