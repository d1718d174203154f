//! Entry point that ties C2/C3/C4/C5/C6 together for one topic's worth of
//! a metadata response (spec.md S4.6, S9 open question).

use crate::broker::BrokerManager;
use crate::config::ClientRole;
use crate::errors::{ErrorKind, KafkaCode};
use crate::message::Message;
use crate::partition::PartitionId;
use crate::partitioner::Partitioner;

use super::leader::LeaderChange;
use super::state::{TopicRef, TopicState};
use super::{leader, reconcile, ua};

pub struct PartitionMetadata {
    pub id: PartitionId,
    pub leader: Option<i32>,
}

pub enum TopicMetadataResult {
    Exists { partitions: Vec<PartitionMetadata> },
    Error(KafkaCode),
}

/// Only these codes mean the topic itself is gone (spec.md S9): a
/// successful response reporting zero partitions is left alone, exactly
/// as the system this was distilled from treats it. Every other error
/// code is handled as the transient case spec.md S4.6 calls out for
/// `LeaderNotAvailable` -- logged and ignored, no state change. The
/// original also special-cases "clear delegation on topic-wide errors"
/// for non-terminal, non-transient codes; this crate's error surface
/// doesn't distinguish those from the transient case (see DESIGN.md).
fn is_terminal(code: KafkaCode) -> bool {
    matches!(code, KafkaCode::UnknownTopicOrPartition | KafkaCode::Unknown)
}

fn propagate_notexists(topic: &TopicRef) {
    for partition in topic.desired_partitions() {
        partition.enq_error(ErrorKind::UnknownTopic(topic.name.clone()));
    }
}

/// Applies one topic's metadata response. Returns messages that failed
/// permanently as a side effect of flushing the UA slot, paired with the
/// error they should be delivered with, plus whether the caller should
/// schedule a follow-up leader query (spec.md S4.6 step 5).
pub fn apply_topic_metadata(
    topic: &TopicRef,
    result: TopicMetadataResult,
    role: ClientRole,
    terminating: bool,
    now: i64,
    broker_mgr: &dyn BrokerManager,
    partitioner: &dyn Partitioner,
) -> (Vec<(Message, ErrorKind)>, bool) {
    let old_state = topic.state();
    topic.touch_metadata(now);

    let mut query_leader = false;
    let changed = match result {
        TopicMetadataResult::Error(code) => {
            if !is_terminal(code) {
                return (Vec::new(), false);
            }
            topic.set_state(TopicState::NotExists);
            let changed = reconcile::partition_cnt_update(topic, 0, terminating);
            if old_state != TopicState::NotExists && role == ClientRole::Consumer {
                propagate_notexists(topic);
            }
            changed
        }
        TopicMetadataResult::Exists { partitions } => {
            // spec.md S9: a NoError reply reporting zero partitions does not,
            // by itself, move a fresh topic out of Unknown.
            if !partitions.is_empty() {
                topic.set_state(TopicState::Exists);
            }
            let changed = reconcile::partition_cnt_update(topic, partitions.len() as i32, terminating);

            for pm in &partitions {
                match topic.partition(pm.id) {
                    Some(partition) => {
                        let candidate = leader::resolve_leader(pm.leader, broker_mgr);
                        if leader::leader_update(&partition, candidate, broker_mgr) == LeaderChange::LeaderUnknown {
                            debug!("leader unknown for {}[{}]", topic.name, pm.id);
                            query_leader = true;
                        }
                    }
                    None => {
                        warn!("metadata named partition {}[{}] not present in partition array", topic.name, pm.id);
                        query_leader = true;
                    }
                }
            }
            changed
        }
    };

    if role != ClientRole::Producer || !(changed || topic.state() == TopicState::NotExists) {
        return (Vec::new(), query_leader);
    }

    let failed = ua::flush_ua(topic, partitioner);
    let is_notexists = topic.state() == TopicState::NotExists;

    let failed = failed
        .into_iter()
        .map(|message| {
            let error = if is_notexists {
                ErrorKind::UnknownTopic(topic.name.clone())
            } else {
                let partition = message.forced_partition.unwrap_or(crate::partition::UA);
                ErrorKind::UnknownPartition(topic.name.clone(), partition)
            };
            (message, error)
        })
        .collect();
    (failed, query_leader)
}
