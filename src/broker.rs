//! The broker-client collaborator (spec.md S6, "consumed"). Connection
//! handling and request/response plumbing live outside this crate; what's
//! modeled here is just enough of `Broker`/`Cluster` (named after the
//! teacher's `client::{Broker, BrokerRef, Cluster}` module split) to resolve
//! a node id to a handle and ask whether that handle is presently usable.

use std::sync::Arc;

pub type NodeId = i32;

/// A broker handle. Identity (not structural) equality is what the leader
/// updater compares against (spec.md S4.4): two `Broker`s for the same node
/// id obtained from two separate lookups are equal only if they are the
/// same `Arc`.
#[derive(Debug)]
pub struct Broker {
    pub id: NodeId,
    pub host: String,
    pub port: u16,
}

impl Broker {
    pub fn new(id: NodeId, host: impl Into<String>, port: u16) -> Arc<Broker> {
        Arc::new(Broker {
            id,
            host: host.into(),
            port,
        })
    }
}

impl PartialEq for Broker {
    fn eq(&self, other: &Broker) -> bool {
        std::ptr::eq(self, other)
    }
}

/// Resolves node ids to broker handles and reports broker usability. A real
/// implementation backs this with live connections; this crate only
/// depends on the trait.
pub trait BrokerManager: Send + Sync {
    /// Callable under the client read lock (spec.md S4.4 "Broker-lookup
    /// ordering rule").
    fn find_broker_by_nodeid(&self, id: NodeId) -> Option<Arc<Broker>>;

    /// `true` if the broker is in a state suitable for carrying a
    /// partition's traffic ("proper broker", spec.md S4.8).
    fn broker_is_usable(&self, broker: &Arc<Broker>) -> bool;
}

/// A simple in-memory broker directory, adequate for embedding this crate
/// before a real network layer exists, and for tests.
pub struct StaticBrokerManager {
    brokers: parking_lot::RwLock<std::collections::HashMap<NodeId, Arc<Broker>>>,
    unusable: parking_lot::RwLock<std::collections::HashSet<NodeId>>,
}

impl StaticBrokerManager {
    pub fn new() -> Self {
        StaticBrokerManager {
            brokers: parking_lot::RwLock::new(std::collections::HashMap::new()),
            unusable: parking_lot::RwLock::new(std::collections::HashSet::new()),
        }
    }

    pub fn insert(&self, broker: Arc<Broker>) {
        self.brokers.write().insert(broker.id, broker);
    }

    pub fn set_usable(&self, id: NodeId, usable: bool) {
        let mut unusable = self.unusable.write();
        if usable {
            unusable.remove(&id);
        } else {
            unusable.insert(id);
        }
    }
}

impl Default for StaticBrokerManager {
    fn default() -> Self {
        StaticBrokerManager::new()
    }
}

impl BrokerManager for StaticBrokerManager {
    fn find_broker_by_nodeid(&self, id: NodeId) -> Option<Arc<Broker>> {
        self.brokers.read().get(&id).cloned()
    }

    fn broker_is_usable(&self, broker: &Arc<Broker>) -> bool {
        !self.unusable.read().contains(&broker.id)
    }
}
