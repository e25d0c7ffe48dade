//! Client Module
//!
//! Client proxies issue cache operations to the coordinator and wait for the
//! matching reply. Any number of operations may be in flight at once; each
//! one is bounded by the client's request timeout.

mod pending;
mod router;

use std::sync::Arc;

use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{CacheError, Result};
use crate::host::HostProcess;
use crate::protocol::{ClearArgs, Command, KeyArgs, OptionOverrides, Request, RequestOptions, SetArgs};
use crate::transport::{Peer, Role, Transport};

pub use pending::{PendingKey, PendingRegistry, PendingSlot};
pub use router::ReplyRouter;

// == Cache Client ==
/// Handle for reading and writing the shared cache from a worker.
#[derive(Clone)]
pub struct CacheClient {
    id: String,
    namespace: String,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    pending: Arc<PendingRegistry>,
}

impl CacheClient {
    // == Constructor ==
    /// Creates a client on `host`.
    ///
    /// Without a configured namespace the client's own id is used, which keeps
    /// its keys private. Fails with `RoleViolation` in the coordinator role.
    pub fn new(host: &HostProcess, config: ClientConfig) -> Result<Self> {
        let role = host.role();
        if role == Role::Coordinator {
            return Err(CacheError::RoleViolation {
                component: "CacheClient",
                role,
            });
        }

        let router = ReplyRouter::install(host);
        let id = Uuid::new_v4().to_string();
        let namespace = config.namespace.clone().unwrap_or_else(|| id.clone());

        Ok(Self {
            id,
            namespace,
            config,
            transport: host.transport().clone(),
            pending: router.pending().clone(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Number of this client's requests still awaiting a reply.
    pub fn pending_requests(&self) -> usize {
        self.pending.count_for(&self.id)
    }

    // == Get ==
    /// Reads `key`. Returns None on a miss.
    pub async fn get(&self, key: impl Into<String>) -> Result<Option<Value>> {
        self.get_with(key, OptionOverrides::default()).await
    }

    pub async fn get_with(
        &self,
        key: impl Into<String>,
        overrides: OptionOverrides,
    ) -> Result<Option<Value>> {
        let command = Command::Get(KeyArgs {
            key: key.into(),
            namespace: self.namespace.clone(),
            options: Some(self.resolve_options(&overrides)),
        });
        self.request(command).await
    }

    // == Set ==
    /// Stores `value` under `key`.
    pub async fn set(&self, key: impl Into<String>, value: Value) -> Result<()> {
        self.set_with(key, value, OptionOverrides::default()).await
    }

    pub async fn set_with(
        &self,
        key: impl Into<String>,
        value: Value,
        overrides: OptionOverrides,
    ) -> Result<()> {
        let command = Command::Set(SetArgs {
            key: key.into(),
            namespace: self.namespace.clone(),
            value,
            options: Some(self.resolve_options(&overrides)),
        });
        self.request(command).await.map(|_| ())
    }

    // == Delete ==
    /// Removes `key`. Succeeds whether or not the key existed.
    pub async fn delete(&self, key: impl Into<String>) -> Result<()> {
        let command = Command::Delete(KeyArgs {
            key: key.into(),
            namespace: self.namespace.clone(),
            options: None,
        });
        self.request(command).await.map(|_| ())
    }

    // == Clear ==
    /// Removes every key in this client's namespace.
    pub async fn clear(&self) -> Result<()> {
        let command = Command::Clear(ClearArgs {
            namespace: self.namespace.clone(),
        });
        self.request(command).await.map(|_| ())
    }

    /// Options for one call: the configured defaults, with `overrides` merged
    /// in only when this client allows it.
    fn resolve_options(&self, overrides: &OptionOverrides) -> RequestOptions {
        let defaults = self.config.request_options;
        if overrides.is_empty() {
            return defaults;
        }
        if !self.config.allow_overrides {
            warn!(
                client_id = %self.id,
                ?overrides,
                "Option overrides are not allowed for this client, using configured options"
            );
            return defaults;
        }
        defaults.merged(overrides)
    }

    async fn request(&self, command: Command) -> Result<Option<Value>> {
        let request_id = Uuid::new_v4().to_string();
        let message = Request::new(&self.id, &request_id, &command)?.to_message()?;

        let mut slot = self
            .pending
            .register(PendingKey::new(&self.id, &request_id));

        debug!(
            client_id = %self.id,
            request_id = %request_id,
            operation = %command.operation(),
            "Sending request"
        );
        self.transport.send(Peer::Coordinator, message)?;

        match timeout(self.config.request_timeout(), &mut slot.receiver).await {
            Ok(Ok(reply)) => reply.into_result(),
            Ok(Err(_)) => Err(CacheError::Transport(format!(
                "request {} was discarded before its reply arrived",
                request_id
            ))),
            Err(_) => {
                if slot.cancel() {
                    return Err(CacheError::Timeout {
                        request_id,
                        client_id: self.id.clone(),
                    });
                }
                // The reply was routed just as the timer fired.
                match slot.receiver.try_recv() {
                    Ok(reply) => reply.into_result(),
                    Err(_) => Err(CacheError::Timeout {
                        request_id,
                        client_id: self.id.clone(),
                    }),
                }
            }
        }
    }
}

impl std::fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheClient")
            .field("id", &self.id)
            .field("namespace", &self.namespace)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::LocalGroup;
    use std::io;
    use std::sync::Mutex;

    fn worker_host() -> (LocalGroup, HostProcess) {
        let group = LocalGroup::new();
        let host = HostProcess::new(group.spawn_worker());
        (group, host)
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn test_client_in_coordinator_role_fails() {
        let group = LocalGroup::new();
        let host = HostProcess::new(group.coordinator());

        let result = CacheClient::new(&host, ClientConfig::default());
        assert!(matches!(
            result,
            Err(CacheError::RoleViolation {
                role: Role::Coordinator,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_default_namespace_is_client_id() {
        let (_group, host) = worker_host();

        let a = CacheClient::new(&host, ClientConfig::default()).unwrap();
        let b = CacheClient::new(&host, ClientConfig::default()).unwrap();
        let shared = CacheClient::new(&host, ClientConfig::shared("users")).unwrap();

        assert_eq!(a.namespace(), a.id());
        assert_ne!(a.id(), b.id());
        assert_eq!(shared.namespace(), "users");
    }

    #[tokio::test]
    async fn test_clients_share_one_router() {
        let (_group, host) = worker_host();

        let a = CacheClient::new(&host, ClientConfig::default()).unwrap();
        let b = CacheClient::new(&host, ClientConfig::default()).unwrap();
        assert!(Arc::ptr_eq(&a.pending, &b.pending));
    }

    #[tokio::test]
    async fn test_rejected_overrides_warn_and_keep_defaults() {
        let (_group, host) = worker_host();
        let client = CacheClient::new(&host, ClientConfig::default()).unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let options = tracing::subscriber::with_default(subscriber, || {
            client.resolve_options(&OptionOverrides::ttl(1))
        });

        assert_eq!(options, RequestOptions::default());
        assert!(logs.contents().contains("not allowed"));
    }

    #[tokio::test]
    async fn test_allowed_overrides_are_merged() {
        let (_group, host) = worker_host();
        let config = ClientConfig {
            allow_overrides: true,
            ..ClientConfig::default()
        };
        let client = CacheClient::new(&host, config).unwrap();

        let options = client.resolve_options(&OptionOverrides::allow_stale(true));
        assert!(options.allow_stale);
        assert_eq!(options.ttl, 300_000);
    }

    #[tokio::test]
    async fn test_send_failure_leaves_nothing_pending() {
        // A group without a coordinator endpoint: sends cannot be routed.
        let (_group, host) = worker_host();
        let client = CacheClient::new(&host, ClientConfig::default()).unwrap();

        let result = client.get("k").await;
        assert!(matches!(result, Err(CacheError::Transport(_))));
        assert_eq!(client.pending_requests(), 0);
    }
}
