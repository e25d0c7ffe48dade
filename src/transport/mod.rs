//! Transport Module
//!
//! The message channel between the coordinating process and its workers.
//! Messages are structured JSON values; delivery is at-most-once and no
//! ordering holds across different senders.

mod local;

use std::fmt;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;

pub use local::{LocalEndpoint, LocalGroup};

/// Identifier of a worker within its process group.
pub type WorkerId = u32;

// == Role ==
/// The role a process plays in the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Coordinator,
    Worker,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Coordinator => f.write_str("coordinator"),
            Role::Worker => f.write_str("worker"),
        }
    }
}

// == Peer ==
/// Address of a process in the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Peer {
    Coordinator,
    Worker(WorkerId),
}

impl Peer {
    pub fn role(&self) -> Role {
        match self {
            Peer::Coordinator => Role::Coordinator,
            Peer::Worker(_) => Role::Worker,
        }
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Peer::Coordinator => f.write_str("coordinator"),
            Peer::Worker(id) => write!(f, "worker-{}", id),
        }
    }
}

// == Envelope ==
/// An inbound message together with its sender.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub from: Peer,
    pub message: Value,
}

// == Transport Trait ==
/// One process's endpoint on the group transport.
pub trait Transport: Send + Sync + 'static {
    /// Address of this endpoint.
    fn local_peer(&self) -> Peer;

    /// Role of the process owning this endpoint.
    fn role(&self) -> Role {
        self.local_peer().role()
    }

    /// Sends a message to a single peer. No acknowledgment is tracked.
    fn send(&self, to: Peer, message: Value) -> Result<()>;

    /// Registers a new inbound subscription. Every subscriber receives every
    /// message delivered to this endpoint after it subscribed.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<Envelope>;
}
