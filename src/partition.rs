//! The partition object (`Toppar` in the glossary). Out of scope per
//! spec.md S1 ("consumed as a black-box API defined in S6") in the sense
//! that a production client would give this its own connection-aware
//! implementation; this crate carries a working one so the topic/partition
//! core is runnable and testable on its own. One `parking_lot::Mutex`
//! guards everything mutable about a partition, per spec.md S5's
//! three-level lock hierarchy.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::broker::Broker;
use crate::errors::ErrorKind;
use crate::lock_order::{self, Level};
use crate::message::Message;
use crate::topic::TopicInner;

pub type PartitionId = i32;

/// The unassigned staging partition's reserved id — outside the valid
/// `[0, partition_cnt)` range by construction (spec.md S3, S9 "UA as
/// sentinel": modeled as a separate field, this constant exists only for
/// logging and for messages that name it as a forced target).
pub const UA: PartitionId = -1;

bitflags::bitflags! {
    /// spec.md S6 "Per-partition flags include `Desired` and `Unknown`".
    pub struct PartitionFlags: u8 {
        /// The application has expressed interest in this partition even
        /// though the cluster hasn't confirmed it exists.
        const DESIRED = 0b01;
        /// This partition id is not (or no longer) known to the cluster;
        /// only ever set in tandem with being linked into `desired`.
        const UNKNOWN = 0b10;
    }
}

struct PartitionState {
    leader: Option<Arc<Broker>>,
    flags: PartitionFlags,
    /// Messages queued locally, not yet handed to a broker connection.
    msgq: VecDeque<Message>,
    /// Messages handed off and in flight. Scanned for timeouts alongside
    /// `msgq` (spec.md S4.7) and folded back in when a partition is torn
    /// down (spec.md S4.3 step 5).
    xmit_msgq: VecDeque<Message>,
    /// Per-partition consumer notification queue (spec.md S4.3 step 4,
    /// S4.2 "notexists propagation").
    notify: VecDeque<ErrorKind>,
}

pub struct Partition {
    id: PartitionId,
    topic: Weak<TopicInner>,
    state: Mutex<PartitionState>,
}

impl Partition {
    pub fn new(id: PartitionId, topic: Weak<TopicInner>) -> Arc<Partition> {
        Arc::new(Partition {
            id,
            topic,
            state: Mutex::new(PartitionState {
                leader: None,
                flags: PartitionFlags::empty(),
                msgq: VecDeque::new(),
                xmit_msgq: VecDeque::new(),
                notify: VecDeque::new(),
            }),
        })
    }

    pub fn id(&self) -> PartitionId {
        self.id
    }

    pub fn is_ua(&self) -> bool {
        self.id == UA
    }

    /// Name of the owning topic, for logging. The topic may already be
    /// gone (weak reference, spec.md S9 "Cyclic references"); falls back
    /// to a placeholder rather than panicking.
    pub fn topic_name(&self) -> String {
        self.topic
            .upgrade()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "<dropped topic>".to_owned())
    }

    pub fn is_desired(&self) -> bool {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().flags.contains(PartitionFlags::DESIRED)
    }

    pub fn is_unknown(&self) -> bool {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().flags.contains(PartitionFlags::UNKNOWN)
    }

    pub fn set_desired(&self, desired: bool) {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().flags.set(PartitionFlags::DESIRED, desired);
    }

    pub fn set_unknown(&self, unknown: bool) {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().flags.set(PartitionFlags::UNKNOWN, unknown);
    }

    /// Raw delegate/detach (spec.md S6 `delegate_to_broker`); the decision
    /// of *whether* to call this lives in the leader updater (C5).
    pub fn delegate(&self, broker: Option<Arc<Broker>>) {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().leader = broker;
    }

    pub fn current_leader(&self) -> Option<Arc<Broker>> {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().leader.clone()
    }

    pub fn leader_is(&self, broker: &Arc<Broker>) -> bool {
        let _t = lock_order::enter(Level::Partition);
        match &self.state.lock().leader {
            Some(current) => Arc::ptr_eq(current, broker),
            None => false,
        }
    }

    pub fn enqueue_message(&self, message: Message) {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().msgq.push_back(message);
    }

    pub fn enqueue_messages(&self, messages: impl IntoIterator<Item = Message>) {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().msgq.extend(messages);
    }

    /// Drains `msgq` and `xmit_msgq`, in that order, leaving both empty.
    /// Used when a partition is removed (spec.md S4.3 step 5, `move_queues`
    /// + `purge_queues` collapsed into one drain since this crate always
    /// performs them back to back) and when flushing the UA slot (S4.5).
    pub fn take_all_messages(&self) -> Vec<Message> {
        let _t = lock_order::enter(Level::Partition);
        let mut state = self.state.lock();
        let mut out: Vec<Message> = state.msgq.drain(..).collect();
        out.extend(state.xmit_msgq.drain(..));
        out
    }

    pub fn message_count(&self) -> usize {
        let _t = lock_order::enter(Level::Partition);
        let state = self.state.lock();
        state.msgq.len() + state.xmit_msgq.len()
    }

    /// Scans both queues for messages older than their own timeout,
    /// removing and returning them (spec.md S4.7).
    pub fn take_timed_out(&self, now: i64) -> Vec<Message> {
        let _t = lock_order::enter(Level::Partition);
        let mut state = self.state.lock();
        let mut timed_out = Vec::new();
        for queue in [&mut state.msgq, &mut state.xmit_msgq] {
            let mut keep = VecDeque::with_capacity(queue.len());
            for msg in queue.drain(..) {
                if msg.is_timed_out(now) {
                    timed_out.push(msg);
                } else {
                    keep.push_back(msg);
                }
            }
            *queue = keep;
        }
        timed_out
    }

    pub fn enq_error(&self, error: ErrorKind) {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().notify.push_back(error);
    }

    pub fn take_notifications(&self) -> Vec<ErrorKind> {
        let _t = lock_order::enter(Level::Partition);
        self.state.lock().notify.drain(..).collect()
    }
}

impl std::fmt::Debug for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Partition({}[{}])", self.topic_name(), self.id)
    }
}
