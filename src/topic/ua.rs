//! C6: unassigned-partition flusher (spec.md S4.5). Runs only on
//! producer-role clients, after a partition-count change or a
//! transition into `NotExists` (gating lives in the caller, which also
//! knows the client's role).

use crate::message::Message;
use crate::partitioner::Partitioner;

use super::state::{TopicRef, TopicState};

/// Drains the UA slot and re-routes every message. A message with a
/// forced partition id that's out of range for an already-confirmed
/// topic can never land and fails immediately; otherwise the topic's
/// partitioner decides, and a partitioner failure fails the message too
/// (spec.md S4.5 steps 1-2). The caller delivers the returned messages
/// with `UnknownTopic` or `UnknownPartition` depending on the topic's
/// final state (step 3).
pub fn flush_ua(topic: &TopicRef, partitioner: &dyn Partitioner) -> Vec<Message> {
    let staged = topic.ua.take_all_messages();
    if staged.is_empty() {
        return Vec::new();
    }

    let state = topic.state();
    let partition_cnt = topic.partition_count() as i32;
    let mut failed = Vec::new();
    let mut still_staged = Vec::new();

    for message in staged {
        if let Some(id) = message.forced_partition {
            if id < 0 || id >= partition_cnt {
                if state == TopicState::Unknown {
                    // May still become valid once metadata arrives; there's
                    // no retry path but the next flush, so leave it in UA.
                    still_staged.push(message);
                } else {
                    failed.push(message);
                }
                continue;
            }
            match topic.partition(id) {
                Some(partition) => partition.enqueue_message(message),
                None => failed.push(message),
            }
            continue;
        }

        match partitioner.partition(&message, partition_cnt) {
            Ok(id) => match topic.partition(id) {
                Some(partition) => partition.enqueue_message(message),
                None => failed.push(message),
            },
            Err(_) => failed.push(message),
        }
    }

    topic.ua.enqueue_messages(still_staged);
    failed
}
