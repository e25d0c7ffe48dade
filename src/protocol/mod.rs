//! Protocol Module
//!
//! The request/reply contract between client proxies and the coordinator.
//!
//! # Wire format
//! - Request: `{ args, clientId, operation, requestId, sourceId }`
//! - Reply: `{ clientId, requestId, sourceId, data?, error? }`

mod command;
mod message;

pub use command::{
    ClearArgs, Command, KeyArgs, Operation, OptionOverrides, RequestOptions, SetArgs,
};
pub use message::{Reply, Request};

/// Identifies this protocol's messages on a shared transport.
pub const SOURCE_ID: &str = "cluster-cache";
