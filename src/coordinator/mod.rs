//! Coordinator Module
//!
//! The single owner of the shared store. Requests arriving over the transport
//! are handled one at a time by a dispatch task that owns the store outright,
//! so store mutations never interleave and no lock guards the store.

mod dispatch;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore};
use crate::config::CoordinatorConfig;
use crate::error::{CacheError, Result};
use crate::host::HostProcess;
use crate::transport::Role;

use dispatch::Dispatcher;

// == Coordinator ==
/// Handle to the process's coordinator.
#[derive(Debug)]
pub struct Coordinator {
    config: CoordinatorConfig,
    stats: watch::Receiver<CacheStats>,
}

impl Coordinator {
    // == Init ==
    /// Returns the coordinator of `host`, starting it on first use.
    ///
    /// Once a coordinator exists, later calls return it and their `config` is
    /// discarded. Fails with `RoleViolation` outside the coordinator role and
    /// with `InvalidConfig` when the store would be unbounded.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn init(host: &HostProcess, config: CoordinatorConfig) -> Result<Arc<Self>> {
        let role = host.role();
        if role != Role::Coordinator {
            return Err(CacheError::RoleViolation {
                component: "Coordinator",
                role,
            });
        }

        if let Some(existing) = host.coordinator_slot().get() {
            if existing.config != config {
                debug!("Coordinator already running, new configuration discarded");
            }
            return Ok(existing.clone());
        }

        let store = CacheStore::new(config.limits())?;
        let coordinator = host
            .coordinator_slot()
            .get_or_init(|| Self::start(host, store, config));

        Ok(coordinator.clone())
    }

    fn start(host: &HostProcess, store: CacheStore, config: CoordinatorConfig) -> Arc<Self> {
        let inbound = host.transport().subscribe();
        let (stats_tx, stats_rx) = watch::channel(store.stats());

        let dispatcher = Dispatcher::new(store, host.transport().clone(), stats_tx);
        tokio::spawn(dispatcher.run(inbound, config.purge_interval()));

        info!(
            "Coordinator started: max_entries={:?}, max_size={:?}, default_ttl_ms={:?}",
            config.max_entries, config.max_size, config.default_ttl_ms
        );

        Arc::new(Self {
            config,
            stats: stats_rx,
        })
    }

    /// The configuration the coordinator was started with.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Latest statistics published by the dispatch task.
    pub fn stats(&self) -> CacheStats {
        self.stats.borrow().clone()
    }
}
