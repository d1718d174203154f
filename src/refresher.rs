//! The metadata refresher collaborator (spec.md S6, "consumed"):
//! `query_leader` is a non-blocking handoff that schedules an async fetch
//! elsewhere and returns immediately — its result surfaces later as an
//! ordinary metadata update through `Client::apply_topic_metadata`. Nothing
//! in this crate ever blocks on it, and it must never be called while a
//! client or topic lock is held (spec.md S5 "Suspension points").

/// Schedules a leader/metadata query for a topic. Implementations must not
/// block the caller.
pub trait MetadataRefresher: Send + Sync {
    fn query_leader(&self, topic: &str);
}

/// A refresher that does nothing, for callers who drive metadata purely
/// through explicit `apply_topic_metadata` calls (e.g. tests).
pub struct NoopRefresher;

impl MetadataRefresher for NoopRefresher {
    fn query_leader(&self, _topic: &str) {}
}

/// Records every requested topic name, for assertions in tests that need to
/// know a query was scheduled without caring how it would be served.
pub struct RecordingRefresher {
    requested: parking_lot::Mutex<Vec<String>>,
}

impl RecordingRefresher {
    pub fn new() -> Self {
        RecordingRefresher {
            requested: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

impl Default for RecordingRefresher {
    fn default() -> Self {
        RecordingRefresher::new()
    }
}

impl MetadataRefresher for RecordingRefresher {
    fn query_leader(&self, topic: &str) {
        self.requested.lock().push(topic.to_owned());
    }
}
