//! Pending request registry
//!
//! Maps (client id, request id) to the channel awaiting its reply. Each entry
//! leaves the registry exactly once: when its reply is routed, when its
//! request times out, or when the waiting call goes away.

use dashmap::DashMap;
use tokio::sync::oneshot;

use crate::protocol::Reply;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingKey {
    pub client_id: String,
    pub request_id: String,
}

impl PendingKey {
    pub fn new(client_id: &str, request_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            request_id: request_id.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PendingRegistry {
    entries: DashMap<PendingKey, oneshot::Sender<Reply>>,
}

impl PendingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` and returns the slot its reply will land in.
    pub fn register(&self, key: PendingKey) -> PendingSlot<'_> {
        let (tx, rx) = oneshot::channel();
        self.entries.insert(key.clone(), tx);
        PendingSlot {
            registry: self,
            key,
            receiver: rx,
        }
    }

    /// Hands `reply` to its waiting call.
    ///
    /// Returns false if nothing is waiting for it.
    pub fn complete(&self, reply: Reply) -> bool {
        let key = PendingKey::new(&reply.client_id, &reply.request_id);
        match self.entries.remove(&key) {
            Some((_, waiter)) => waiter.send(reply).is_ok(),
            None => false,
        }
    }

    /// Drops the entry for `key`. Returns whether it was still registered.
    pub fn cancel(&self, key: &PendingKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &PendingKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of requests awaiting a reply for `client_id`.
    pub fn count_for(&self, client_id: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.key().client_id == client_id)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Pending Slot ==
/// A registered request's receiving end. Dropping the slot unregisters it.
#[derive(Debug)]
pub struct PendingSlot<'a> {
    registry: &'a PendingRegistry,
    key: PendingKey,
    pub(crate) receiver: oneshot::Receiver<Reply>,
}

impl PendingSlot<'_> {
    pub fn key(&self) -> &PendingKey {
        &self.key
    }

    /// Unregisters the request. Returns false if its reply was already routed.
    pub fn cancel(&self) -> bool {
        self.registry.cancel(&self.key)
    }
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.registry.cancel(&self.key);
    }
}
