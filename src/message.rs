//! Messages as they sit in a partition's queues. Message *contents* and the
//! wire encoding of a produced record are out of scope for this crate
//! (spec.md S1 "Message objects ... consumed as a black-box API"); what
//! lives here is the minimal shape the routing core needs to look at: a
//! forced partition id, a key for the partitioner, and an age for the
//! scanner.

use crate::partition::PartitionId;

/// A message queued for production, somewhere between the application
/// handing it to the client and a broker acknowledging it.
#[derive(Debug, Clone)]
pub struct Message {
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
    /// `None` means "let the partitioner choose"; `Some(id)` is an
    /// application-forced partition, which may be out of range (spec.md
    /// S4.5 step 2).
    pub forced_partition: Option<PartitionId>,
    /// Monotonic enqueue time, in the same units as `Clock::now()`.
    pub enqueued_at: i64,
    /// How long this message may wait before the scanner times it out.
    pub timeout_micros: i64,
}

impl Message {
    pub fn new(payload: Vec<u8>, enqueued_at: i64, timeout_micros: i64) -> Self {
        Message {
            key: None,
            payload,
            forced_partition: None,
            enqueued_at,
            timeout_micros,
        }
    }

    pub fn with_key(mut self, key: Vec<u8>) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_forced_partition(mut self, partition: PartitionId) -> Self {
        self.forced_partition = Some(partition);
        self
    }

    pub fn is_timed_out(&self, now: i64) -> bool {
        now > self.enqueued_at + self.timeout_micros
    }
}
