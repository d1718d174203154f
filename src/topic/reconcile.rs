//! C4: partition-count reconciler (spec.md S4.3).

use std::sync::Arc;

use crate::errors::ErrorKind;
use crate::lock_order::{self, Level};
use crate::partition::Partition;

use super::state::TopicRef;

/// Reconciles the topic's partition array to a newly learned partition
/// count. Returns whether anything changed.
///
/// Growing adopts any matching entry already parked in `desired` so its
/// identity (and anything still attached to it) survives (spec.md S4.3
/// step 3). Every partition still left in `desired` afterward gets a
/// fresh `UnknownPartition` notification (step 4), unless the client is
/// tearing down. Shrinking detaches the removed partitions' broker
/// delegation and drains their queues into UA unconditionally; a removed
/// partition the application still wants is kept alive in `desired`,
/// flagged `Unknown`, instead of being dropped (step 5).
pub fn partition_cnt_update(topic: &TopicRef, new_cnt: i32, terminating: bool) -> bool {
    let _t = lock_order::enter(Level::Topic);
    let mut guts = topic.guts.lock();

    let old_cnt = guts.partitions.len() as i32;
    if new_cnt == old_cnt {
        return false;
    }

    if new_cnt > old_cnt {
        for id in old_cnt..new_cnt {
            let partition: Arc<Partition> = match guts.desired.remove(&id) {
                Some(reused) => {
                    reused.set_unknown(false);
                    reused
                }
                None => Partition::new(id, Arc::downgrade(topic)),
            };
            guts.partitions.push(partition);
        }
    }

    if !terminating {
        for partition in guts.desired.values() {
            partition.enq_error(ErrorKind::UnknownPartition(topic.name.clone(), partition.id()));
        }
    }

    if new_cnt < old_cnt {
        for removed in guts.partitions.split_off(new_cnt.max(0) as usize) {
            removed.delegate(None);
            let orphaned = removed.take_all_messages();
            topic.ua.enqueue_messages(orphaned);

            if removed.is_desired() {
                removed.set_unknown(true);
                if !terminating {
                    removed.enq_error(ErrorKind::UnknownPartition(topic.name.clone(), removed.id()));
                }
                guts.desired.insert(removed.id(), removed);
            }
        }
    }

    true
}
