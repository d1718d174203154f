//! C7: periodic scanner (spec.md S4.7). Ages metadata, ages messages,
//! and provokes a refresh where needed.

use crate::delivery::DeliveryReportSink;
use crate::errors::ErrorKind;
use crate::refresher::MetadataRefresher;

use super::state::{TopicRef, TopicState};

/// Returns the number of messages timed out across this topic's
/// partitions (including UA).
pub fn scan(
    topic: &TopicRef,
    now: i64,
    refresh_interval_micros: i64,
    refresher: &dyn MetadataRefresher,
    sink: &dyn DeliveryReportSink,
) -> usize {
    if topic.state() != TopicState::Unknown
        && refresh_interval_micros >= 0
        && now > topic.ts_metadata() + 3 * refresh_interval_micros
    {
        topic.set_state(TopicState::Unknown);
    }

    if topic.partition_count() == 0 {
        refresher.query_leader(&topic.name);
    }

    let mut partitions = topic.partitions();
    partitions.push(topic.ua.clone());

    let mut total = 0;
    for partition in partitions {
        let timed_out = partition.take_timed_out(now);
        if timed_out.is_empty() {
            continue;
        }
        total += timed_out.len();
        sink.deliver(
            &topic.name,
            timed_out,
            ErrorKind::MessageTimedOut(topic.name.clone(), partition.id()),
        );
    }
    total
}
