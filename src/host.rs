//! Host Process Handle
//!
//! One `HostProcess` stands for one process of the group. It owns the
//! process's transport endpoint and the once-per-process components built on
//! top of it: the coordinator (coordinator role) and the reply router (worker
//! role). Pass it explicitly to whatever needs those components.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::client::ReplyRouter;
use crate::coordinator::Coordinator;
use crate::transport::{Peer, Role, Transport};

pub struct HostProcess {
    transport: Arc<dyn Transport>,
    coordinator: OnceLock<Arc<Coordinator>>,
    replies: OnceLock<Arc<ReplyRouter>>,
}

impl HostProcess {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            coordinator: OnceLock::new(),
            replies: OnceLock::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.transport.role()
    }

    pub fn peer(&self) -> Peer {
        self.transport.local_peer()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub(crate) fn coordinator_slot(&self) -> &OnceLock<Arc<Coordinator>> {
        &self.coordinator
    }

    pub(crate) fn reply_slot(&self) -> &OnceLock<Arc<ReplyRouter>> {
        &self.replies
    }
}

impl fmt::Debug for HostProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostProcess")
            .field("peer", &self.peer())
            .field("coordinator", &self.coordinator.get().is_some())
            .field("replies", &self.replies.get().is_some())
            .finish()
    }
}
