//! The partitioner (spec.md S1, "consumed"). Chooses a concrete partition
//! for a message that doesn't carry a forced one. Named and shaped after
//! the teacher's `producer::{Partitioner, DefaultPartitioner}`.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::Result;
use crate::message::Message;
use crate::partition::PartitionId;

/// Chooses a partition for a message given the topic's current partition
/// count. Returning `Err` means the message cannot be routed right now
/// (spec.md S4.5: "on failure route `m` to `failed`").
pub trait Partitioner: Send + Sync {
    fn partition(&self, message: &Message, partition_cnt: i32) -> Result<PartitionId>;
}

/// Hashes the message key if present, otherwise round-robins. Mirrors
/// librdkafka's default `consistent_random` partitioner.
#[derive(Default)]
pub struct DefaultPartitioner {
    next: AtomicUsize,
}

impl DefaultPartitioner {
    pub fn new() -> Self {
        DefaultPartitioner {
            next: AtomicUsize::new(0),
        }
    }
}

impl Partitioner for DefaultPartitioner {
    fn partition(&self, message: &Message, partition_cnt: i32) -> Result<PartitionId> {
        if partition_cnt <= 0 {
            bail!("no partitions available for partitioning");
        }

        let chosen = match message.key {
            Some(ref key) if !key.is_empty() => crc32(key) as i64 % partition_cnt as i64,
            _ => (self.next.fetch_add(1, Ordering::Relaxed) as i64) % partition_cnt as i64,
        };

        Ok(chosen as PartitionId)
    }
}

/// Picks a uniformly random partition, ignoring the key. Useful for tests
/// that want to exercise a failing partitioner deterministically via
/// `AlwaysFailPartitioner` below instead.
pub struct RandomPartitioner;

impl Partitioner for RandomPartitioner {
    fn partition(&self, _message: &Message, partition_cnt: i32) -> Result<PartitionId> {
        if partition_cnt <= 0 {
            bail!("no partitions available for partitioning");
        }
        Ok(rand::thread_rng().gen_range(0, partition_cnt) as PartitionId)
    }
}

/// Always fails to partition; used in tests that exercise the
/// "desired partition not available" failure path (spec.md S4.5).
pub struct AlwaysFailPartitioner;

impl Partitioner for AlwaysFailPartitioner {
    fn partition(&self, _message: &Message, _partition_cnt: i32) -> Result<PartitionId> {
        bail!("partitioner refused to assign a partition")
    }
}

fn crc32(data: &[u8]) -> u32 {
    // A small table-free CRC32 (IEEE polynomial), adequate for picking a
    // partition bucket; not used for data integrity.
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_partitioner_is_deterministic_for_same_key() {
        let p = DefaultPartitioner::new();
        let m = Message::new(vec![], 0, 0).with_key(b"user-42".to_vec());
        let a = p.partition(&m, 8).unwrap();
        let b = p.partition(&m, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn default_partitioner_round_robins_without_key() {
        let p = DefaultPartitioner::new();
        let m = Message::new(vec![], 0, 0);
        let a = p.partition(&m, 4).unwrap();
        let b = p.partition(&m, 4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_zero_partitions() {
        let p = DefaultPartitioner::new();
        let m = Message::new(vec![], 0, 0);
        assert!(p.partition(&m, 0).is_err());
    }
}
