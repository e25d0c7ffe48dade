//! In-process Transport
//!
//! A process group living inside one OS process. Each endpoint keeps a list
//! of subscriber channels; a send fans the message out to every live
//! subscriber of the addressed peer.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use super::{Envelope, Peer, Transport, WorkerId};
use crate::error::{CacheError, Result};

type Subscribers = Vec<mpsc::UnboundedSender<Envelope>>;

// == Local Group ==
/// Hands out the endpoints of an in-process group.
#[derive(Debug, Clone, Default)]
pub struct LocalGroup {
    routes: Arc<DashMap<Peer, Subscribers>>,
    next_worker: Arc<AtomicU32>,
}

impl LocalGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the coordinator's endpoint.
    pub fn coordinator(&self) -> Arc<LocalEndpoint> {
        self.endpoint(Peer::Coordinator)
    }

    /// Registers a new worker and returns its endpoint.
    pub fn spawn_worker(&self) -> Arc<LocalEndpoint> {
        let id: WorkerId = self.next_worker.fetch_add(1, Ordering::Relaxed) + 1;
        self.endpoint(Peer::Worker(id))
    }

    fn endpoint(&self, peer: Peer) -> Arc<LocalEndpoint> {
        self.routes.entry(peer).or_default();
        Arc::new(LocalEndpoint {
            peer,
            routes: self.routes.clone(),
        })
    }
}

// == Local Endpoint ==
/// One member's view of a [`LocalGroup`].
#[derive(Debug)]
pub struct LocalEndpoint {
    peer: Peer,
    routes: Arc<DashMap<Peer, Subscribers>>,
}

impl Transport for LocalEndpoint {
    fn local_peer(&self) -> Peer {
        self.peer
    }

    fn send(&self, to: Peer, message: Value) -> Result<()> {
        let mut subscribers = self
            .routes
            .get_mut(&to)
            .ok_or_else(|| CacheError::Transport(format!("no such peer: {}", to)))?;

        let envelope = Envelope {
            from: self.peer,
            message,
        };
        subscribers.retain(|tx| tx.send(envelope.clone()).is_ok());

        if subscribers.is_empty() {
            debug!("{} has no subscribers, message from {} dropped", to, self.peer);
        }
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<Envelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.routes.entry(self.peer).or_default().push(tx);
        rx
    }
}
