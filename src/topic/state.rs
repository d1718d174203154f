//! C2/C3: the topic entity and its existence state machine (spec.md S4.2).
//! One `parking_lot::Mutex` guards everything about a topic that can
//! change after creation, sitting at the middle level of the lock
//! hierarchy (spec.md S5) between the client-level registry and each
//! partition's own lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::TopicConfig;
use crate::lock_order::{self, Level};
use crate::partition::{Partition, PartitionId, UA};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TopicState {
    /// No metadata response has been seen yet for this topic.
    Unknown,
    /// The cluster has confirmed this topic, with some partition count
    /// (possibly zero, spec.md S9 -- zero partitions with `NoError` does
    /// not by itself mean the topic is gone).
    Exists,
    /// The cluster has explicitly reported this topic absent.
    NotExists,
}

pub(crate) struct TopicGuts {
    pub(crate) state: TopicState,
    pub(crate) partitions: Vec<Arc<Partition>>,
    /// Partition ids a consumer has asked for that aren't (or aren't yet)
    /// backed by a live entry in `partitions` (spec.md S4.6).
    pub(crate) desired: HashMap<PartitionId, Arc<Partition>>,
    /// Monotonic timestamp of the last applied metadata; `0` means never
    /// (spec.md S3 `ts_metadata`).
    pub(crate) ts_metadata: i64,
}

pub struct TopicInner {
    pub name: String,
    pub config: TopicConfig,
    /// The unassigned staging partition, always present (spec.md S3).
    pub ua: Arc<Partition>,
    pub(crate) guts: Mutex<TopicGuts>,
}

pub type TopicRef = Arc<TopicInner>;

impl TopicInner {
    pub fn new(name: String, config: TopicConfig) -> TopicRef {
        Arc::new_cyclic(|weak| TopicInner {
            name,
            config,
            ua: Partition::new(UA, weak.clone()),
            guts: Mutex::new(TopicGuts {
                state: TopicState::Unknown,
                partitions: Vec::new(),
                desired: HashMap::new(),
                ts_metadata: 0,
            }),
        })
    }

    pub fn state(&self) -> TopicState {
        let _t = lock_order::enter(Level::Topic);
        self.guts.lock().state
    }

    pub fn set_state(&self, state: TopicState) {
        let _t = lock_order::enter(Level::Topic);
        self.guts.lock().state = state;
    }

    pub fn ts_metadata(&self) -> i64 {
        let _t = lock_order::enter(Level::Topic);
        self.guts.lock().ts_metadata
    }

    pub fn touch_metadata(&self, now: i64) {
        let _t = lock_order::enter(Level::Topic);
        self.guts.lock().ts_metadata = now;
    }

    pub fn partition_count(&self) -> usize {
        let _t = lock_order::enter(Level::Topic);
        self.guts.lock().partitions.len()
    }

    pub fn partitions(&self) -> Vec<Arc<Partition>> {
        let _t = lock_order::enter(Level::Topic);
        self.guts.lock().partitions.clone()
    }

    pub fn partition(&self, id: PartitionId) -> Option<Arc<Partition>> {
        let _t = lock_order::enter(Level::Topic);
        self.guts.lock().partitions.iter().find(|p| p.id() == id).cloned()
    }

    pub fn desired_partitions(&self) -> Vec<Arc<Partition>> {
        let _t = lock_order::enter(Level::Topic);
        self.guts.lock().desired.values().cloned().collect()
    }

    /// Links a consumer-requested partition id the cluster hasn't (yet)
    /// confirmed (spec.md S4.6). If the id is already a live partition,
    /// just marks it desired and hands that back instead of creating a
    /// shadow entry.
    pub fn desired_link(self: &Arc<Self>, id: PartitionId) -> Arc<Partition> {
        let _t = lock_order::enter(Level::Topic);
        let mut guts = self.guts.lock();
        if let Some(live) = guts.partitions.iter().find(|p| p.id() == id) {
            live.set_desired(true);
            return live.clone();
        }
        guts.desired
            .entry(id)
            .or_insert_with(|| {
                let partition = Partition::new(id, Arc::downgrade(self));
                partition.set_desired(true);
                partition.set_unknown(true);
                partition
            })
            .clone()
    }

    pub fn desired_unlink(&self, id: PartitionId) {
        let _t = lock_order::enter(Level::Topic);
        let mut guts = self.guts.lock();
        if let Some(live) = guts.partitions.iter().find(|p| p.id() == id) {
            live.set_desired(false);
        }
        guts.desired.remove(&id);
    }

    pub fn desired_get(&self, id: PartitionId) -> Option<Arc<Partition>> {
        let _t = lock_order::enter(Level::Topic);
        self.guts.lock().desired.get(&id).cloned()
    }
}
