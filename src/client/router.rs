//! Reply routing
//!
//! A worker process runs exactly one reply router. It reads every inbound
//! message and hands replies of this protocol to the waiting call; anything
//! else is left alone so other protocols can share the transport.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use super::pending::PendingRegistry;
use crate::host::HostProcess;
use crate::protocol::Reply;
use crate::transport::Envelope;

#[derive(Debug)]
pub struct ReplyRouter {
    pending: Arc<PendingRegistry>,
}

impl ReplyRouter {
    /// Returns the router of `host`, subscribing it on first use.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn install(host: &HostProcess) -> Arc<Self> {
        host.reply_slot()
            .get_or_init(|| {
                let pending = Arc::new(PendingRegistry::new());
                let inbound = host.transport().subscribe();
                tokio::spawn(Self::run(pending.clone(), inbound));
                debug!("Reply router installed on {}", host.peer());
                Arc::new(Self { pending })
            })
            .clone()
    }

    pub fn pending(&self) -> &Arc<PendingRegistry> {
        &self.pending
    }

    async fn run(pending: Arc<PendingRegistry>, mut inbound: mpsc::UnboundedReceiver<Envelope>) {
        while let Some(envelope) = inbound.recv().await {
            route(&pending, &envelope.message);
        }
        debug!("Reply router stopped, transport closed");
    }
}

/// Delivers `message` if it is a reply someone is waiting for.
fn route(pending: &PendingRegistry, message: &Value) -> bool {
    let Some(reply) = Reply::from_message(message) else {
        return false;
    };

    let request_id = reply.request_id.clone();
    let delivered = pending.complete(reply);
    if !delivered {
        debug!(request_id = %request_id, "Dropping unmatched or late reply");
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::pending::PendingKey;
    use crate::protocol::SOURCE_ID;
    use serde_json::json;

    fn reply_message(client_id: &str, request_id: &str, source_id: &str) -> Value {
        json!({
            "clientId": client_id,
            "requestId": request_id,
            "sourceId": source_id,
            "data": 7,
        })
    }

    #[test]
    fn test_route_matching_reply() {
        let pending = PendingRegistry::new();
        let _slot = pending.register(PendingKey::new("c1", "r1"));

        assert!(route(&pending, &reply_message("c1", "r1", SOURCE_ID)));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_route_ignores_foreign_source_and_client() {
        let pending = PendingRegistry::new();
        let _slot = pending.register(PendingKey::new("c1", "r1"));

        assert!(!route(&pending, &reply_message("c1", "r1", "other-protocol")));
        assert!(!route(&pending, &reply_message("c2", "r1", SOURCE_ID)));
        assert!(!route(&pending, &json!(42)));
        assert_eq!(pending.len(), 1);
    }
}
