//! C8: availability probe (spec.md S4.8), used by partitioners that want
//! to avoid routing onto a partition with no usable leader.

use crate::broker::BrokerManager;
use crate::partition::PartitionId;

use super::state::TopicRef;

/// `true` iff partition `id` exists and has a leader broker presently in
/// a usable state. Unlike `TopicInner::partition`, never falls back to
/// UA -- an absent id is simply unavailable.
pub fn partition_available(topic: &TopicRef, id: PartitionId, broker_mgr: &dyn BrokerManager) -> bool {
    topic
        .partition(id)
        .and_then(|partition| partition.current_leader())
        .map(|broker| broker_mgr.broker_is_usable(&broker))
        .unwrap_or(false)
}
