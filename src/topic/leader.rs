//! C5: leader updater (spec.md S4.4).

use std::sync::Arc;

use crate::broker::{Broker, BrokerManager, NodeId};
use crate::partition::Partition;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LeaderChange {
    NoChange,
    Changed,
    LeaderUnknown,
}

/// Resolves a leader node id to a broker handle. Must be called before
/// descending into the topic/partition locks (spec.md S4.4
/// "broker-lookup ordering rule") -- the broker directory lives at the
/// client level of the hierarchy.
pub fn resolve_leader(node_id: Option<NodeId>, broker_mgr: &dyn BrokerManager) -> Option<Arc<Broker>> {
    node_id.and_then(|id| broker_mgr.find_broker_by_nodeid(id))
}

/// Applies a resolved leader candidate to a partition. A candidate that
/// fails `broker_is_usable` is treated the same as no candidate at all
/// (spec.md S4.8 "proper broker").
pub fn leader_update(
    partition: &Partition,
    candidate: Option<Arc<Broker>>,
    broker_mgr: &dyn BrokerManager,
) -> LeaderChange {
    let candidate = candidate.filter(|b| broker_mgr.broker_is_usable(b));

    match candidate {
        None => {
            if partition.current_leader().is_some() {
                partition.delegate(None);
            }
            LeaderChange::LeaderUnknown
        }
        Some(broker) => {
            if partition.leader_is(&broker) {
                LeaderChange::NoChange
            } else {
                partition.delegate(Some(broker));
                LeaderChange::Changed
            }
        }
    }
}
