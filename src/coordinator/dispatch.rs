//! Request dispatch
//!
//! The coordinator's dispatch task. It owns the store and handles each
//! inbound request to completion before looking at the next one.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::error::Result;
use crate::namespace;
use crate::protocol::{Command, Reply, Request};
use crate::transport::{Envelope, Transport};

pub(crate) struct Dispatcher {
    store: CacheStore,
    transport: Arc<dyn Transport>,
    stats: watch::Sender<CacheStats>,
    traffic: CacheStats,
}

impl Dispatcher {
    pub(crate) fn new(
        store: CacheStore,
        transport: Arc<dyn Transport>,
        stats: watch::Sender<CacheStats>,
    ) -> Self {
        Self {
            store,
            transport,
            stats,
            traffic: CacheStats::new(),
        }
    }

    // == Run ==
    /// Handles inbound messages and periodic purges until the transport
    /// closes.
    pub(crate) async fn run(
        mut self,
        mut inbound: mpsc::UnboundedReceiver<Envelope>,
        purge_every: Duration,
    ) {
        let mut purge = tokio::time::interval(purge_every);
        purge.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                envelope = inbound.recv() => match envelope {
                    Some(envelope) => self.handle(envelope),
                    None => {
                        info!("Transport closed, coordinator stopping");
                        break;
                    }
                },
                _ = purge.tick() => self.purge(),
            }
        }
    }

    // == Handle ==
    /// Dispatches one inbound message and replies to its sender.
    pub(crate) fn handle(&mut self, envelope: Envelope) {
        let Some(request) = Request::from_message(&envelope.message) else {
            debug!("Ignoring non-cache message from {}", envelope.from);
            return;
        };

        let outcome = request.command().and_then(|command| self.execute(command));
        self.traffic.record_request(outcome.is_err());

        let reply = match outcome {
            Ok(data) => Reply::success(&request, data),
            Err(err) => {
                debug!(
                    client_id = %request.client_id,
                    request_id = %request.request_id,
                    "Request failed: {}", err
                );
                Reply::failure(&request, &err)
            }
        };
        self.publish();

        let sent = reply
            .to_message()
            .and_then(|message| self.transport.send(envelope.from, message));
        if let Err(err) = sent {
            warn!(
                request_id = %request.request_id,
                "Reply to {} not delivered: {}", envelope.from, err
            );
        }
    }

    fn execute(&mut self, command: Command) -> Result<Option<Value>> {
        match command {
            Command::Get(args) => {
                let key = namespace::encode(&args.namespace, &args.key);
                let options = args.options.unwrap_or_default().get_options();
                Ok(self.store.get(&key, options))
            }
            Command::Set(args) => {
                let key = namespace::encode(&args.namespace, &args.key);
                let ttl = args.options.map(|options| options.ttl);
                self.store.set(key, args.value, ttl)?;
                Ok(Some(Value::Bool(true)))
            }
            Command::Delete(args) => {
                let key = namespace::encode(&args.namespace, &args.key);
                self.store.delete(&key);
                Ok(Some(Value::Bool(true)))
            }
            Command::Clear(args) => {
                let removed = self.clear_namespace(&args.namespace);
                debug!("Cleared {} entries from namespace '{}'", removed, args.namespace);
                Ok(Some(Value::Bool(true)))
            }
        }
    }

    /// Deletes every entry of `namespace`.
    ///
    /// Walks every key in the store, so the cost is proportional to the whole
    /// store rather than to the namespace.
    fn clear_namespace(&mut self, namespace: &str) -> usize {
        let prefix = namespace::prefix(namespace);
        let doomed: Vec<String> = self
            .store
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();

        for key in &doomed {
            self.store.delete(key);
        }
        doomed.len()
    }

    fn purge(&mut self) {
        let removed = self.store.purge_expired();
        if removed > 0 {
            info!("TTL purge: removed {} expired entries", removed);
            self.publish();
        } else {
            debug!("TTL purge: no expired entries found");
        }
    }

    fn publish(&self) {
        let mut snapshot = self.store.stats();
        snapshot.requests = self.traffic.requests;
        snapshot.request_errors = self.traffic.request_errors;
        self.stats.send_replace(snapshot);
    }
}
