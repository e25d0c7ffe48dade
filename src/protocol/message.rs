//! Wire messages
//!
//! Requests travel from client proxies to the coordinator; replies travel
//! back to the originating worker only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::command::{Command, Operation};
use super::SOURCE_ID;
use crate::error::{CacheError, ReplyError, Result};

// == Request ==
/// A single-use cache request.
///
/// `operation` is kept as the raw wire string so that unknown operations can
/// still be answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub args: Value,
    pub client_id: String,
    pub operation: String,
    pub request_id: String,
    pub source_id: String,
}

impl Request {
    /// Builds the request for `command`.
    pub fn new(client_id: &str, request_id: &str, command: &Command) -> Result<Self> {
        Ok(Self {
            args: command.args()?,
            client_id: client_id.to_string(),
            operation: command.operation().as_str().to_string(),
            request_id: request_id.to_string(),
            source_id: SOURCE_ID.to_string(),
        })
    }

    /// Decodes an inbound message, returning None for anything that is not a
    /// request of this protocol.
    pub fn from_message(message: &Value) -> Option<Self> {
        if message.get("sourceId").and_then(Value::as_str) != Some(SOURCE_ID) {
            return None;
        }
        Self::deserialize(message).ok()
    }

    /// Resolves the operation and its arguments.
    pub fn command(&self) -> Result<Command> {
        let operation: Operation = self.operation.parse()?;
        Command::decode(operation, self.args.clone())
    }

    pub fn to_message(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| CacheError::InvalidRequest(e.to_string()))
    }
}

// == Reply ==
/// The coordinator's answer to one request.
///
/// At most one of `data` and `error` is set; a reply with neither is a miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub client_id: String,
    pub request_id: String,
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ReplyError>,
}

impl Reply {
    /// Successful reply; `data` of None signals a miss.
    pub fn success(request: &Request, data: Option<Value>) -> Self {
        Self {
            client_id: request.client_id.clone(),
            request_id: request.request_id.clone(),
            source_id: request.source_id.clone(),
            data,
            error: None,
        }
    }

    /// Failed reply carrying `error`.
    pub fn failure(request: &Request, error: &CacheError) -> Self {
        Self {
            client_id: request.client_id.clone(),
            request_id: request.request_id.clone(),
            source_id: request.source_id.clone(),
            data: None,
            error: Some(error.to_reply_error()),
        }
    }

    /// Decodes an inbound message, returning None for anything that is not a
    /// reply of this protocol.
    pub fn from_message(message: &Value) -> Option<Self> {
        if message.get("sourceId").and_then(Value::as_str) != Some(SOURCE_ID) {
            return None;
        }
        if message.get("operation").is_some() {
            return None;
        }
        Self::deserialize(message).ok()
    }

    pub fn to_message(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| CacheError::InvalidRequest(e.to_string()))
    }

    /// Converts the reply into the caller's outcome.
    pub fn into_result(self) -> Result<Option<Value>> {
        match self.error {
            Some(error) => Err(CacheError::Remote(error)),
            None => Ok(self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::protocol::{KeyArgs, RequestOptions};
    use serde_json::json;

    fn get_request() -> Request {
        let command = Command::Get(KeyArgs {
            key: "42".to_string(),
            namespace: "users".to_string(),
            options: Some(RequestOptions::default()),
        });
        Request::new("client-1", "req-1", &command).unwrap()
    }

    #[test]
    fn test_request_wire_shape() {
        let message = get_request().to_message().unwrap();

        assert_eq!(message["operation"], "get");
        assert_eq!(message["clientId"], "client-1");
        assert_eq!(message["requestId"], "req-1");
        assert_eq!(message["sourceId"], SOURCE_ID);
        assert_eq!(message["args"]["key"], "42");
        assert_eq!(message["args"]["namespace"], "users");
        assert_eq!(message["args"]["options"]["updateAgeOnGet"], true);
    }

    #[test]
    fn test_request_from_foreign_source_is_ignored() {
        let mut message = get_request().to_message().unwrap();
        message["sourceId"] = json!("some-other-protocol");
        assert!(Request::from_message(&message).is_none());
        assert!(Request::from_message(&json!("not an object")).is_none());
    }

    #[test]
    fn test_unknown_operation_still_decodes_envelope() {
        let mut message = get_request().to_message().unwrap();
        message["operation"] = json!("increment");

        let request = Request::from_message(&message).unwrap();
        assert!(matches!(
            request.command(),
            Err(CacheError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_reply_data_and_error_are_exclusive() {
        let request = get_request();

        let ok = Reply::success(&request, Some(json!({"name": "Ada"})));
        let ok_json = ok.to_message().unwrap();
        assert!(ok_json.get("error").is_none());
        assert_eq!(ok_json["data"]["name"], "Ada");

        let failed = Reply::failure(&request, &CacheError::UnknownOperation("x".to_string()));
        let failed_json = failed.to_message().unwrap();
        assert!(failed_json.get("data").is_none());
        assert_eq!(failed_json["error"]["code"], "unknownOperation");
    }

    #[test]
    fn test_reply_is_not_mistaken_for_request() {
        let request_message = get_request().to_message().unwrap();
        assert!(Reply::from_message(&request_message).is_none());

        let reply = Reply::success(&get_request(), None);
        let decoded = Reply::from_message(&reply.to_message().unwrap()).unwrap();
        assert_eq!(decoded.into_result().unwrap(), None);
    }

    #[test]
    fn test_reply_error_becomes_remote() {
        let reply = Reply::failure(
            &get_request(),
            &CacheError::Store {
                key: "users:42".to_string(),
                reason: "too big".to_string(),
            },
        );

        match reply.into_result() {
            Err(CacheError::Remote(err)) => {
                assert_eq!(err.code, ErrorCode::Store);
                assert!(err.message.contains("users:42"));
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }
}
