//! Client and topic configuration (spec.md S6 "configuration surface").
//! Grounded in the teacher's `client::Config` builder-of-plain-fields shape,
//! generalized to the options this crate's components actually read.

use std::sync::Arc;

use regex::Regex;

use crate::errors::Result;
use crate::partitioner::{DefaultPartitioner, Partitioner};

/// Whether this client acts as a producer or a consumer; governs whether
/// partitions are tracked via produced-message routing or via `desired`
/// (spec.md S3, S4.5/S4.6).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClientRole {
    Producer,
    Consumer,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Snappy,
    Lz4,
}

/// Client-wide configuration.
pub struct ClientConfig {
    pub role: ClientRole,
    /// How often the periodic scanner (C7) sweeps all topics, in
    /// microseconds.
    pub metadata_refresh_interval_micros: i64,
    /// Topics matching this pattern are rejected before a registry entry is
    /// ever created (spec.md S4.6, grounded in `rd_kafka_pattern_match`).
    pub topic_blacklist: Option<Regex>,
    /// Maximum age a message may sit in a partition queue before the
    /// scanner times it out (spec.md S4.7).
    pub message_timeout_micros: i64,
}

impl ClientConfig {
    pub fn new(role: ClientRole) -> Self {
        ClientConfig {
            role,
            metadata_refresh_interval_micros: 5 * 60 * 1_000_000,
            topic_blacklist: None,
            message_timeout_micros: 5 * 60 * 1_000_000,
        }
    }

    pub fn with_blacklist(mut self, pattern: &str) -> Result<Self> {
        self.topic_blacklist = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn is_blacklisted(&self, topic: &str) -> bool {
        self.topic_blacklist
            .as_ref()
            .map(|re| re.is_match(topic))
            .unwrap_or(false)
    }
}

/// Per-topic configuration.
pub struct TopicConfig {
    pub partitioner: Arc<dyn Partitioner>,
    pub compression: Compression,
}

impl Default for TopicConfig {
    fn default() -> Self {
        TopicConfig {
            partitioner: Arc::new(DefaultPartitioner::new()),
            compression: Compression::None,
        }
    }
}

/// Topic names are limited the way the original client limits them
/// (spec.md S7 "name missing or too long"): non-empty and at most 512
/// bytes, matching `RD_KAFKA_TOPIC_NAME_MAX_LEN` in the original source.
pub const TOPIC_NAME_MAX_LEN: usize = 512;

pub fn validate_topic_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!(crate::errors::ErrorKind::InvalidArgument("topic name must not be empty"));
    }
    if name.len() > TOPIC_NAME_MAX_LEN {
        bail!(crate::errors::ErrorKind::InvalidArgument("topic name too long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        assert!(validate_topic_name("").is_err());
    }

    #[test]
    fn rejects_overlong_name() {
        let name = "a".repeat(TOPIC_NAME_MAX_LEN + 1);
        assert!(validate_topic_name(&name).is_err());
    }

    #[test]
    fn accepts_normal_name() {
        assert!(validate_topic_name("orders").is_ok());
    }

    #[test]
    fn blacklist_matches_pattern() {
        let cfg = ClientConfig::new(ClientRole::Producer)
            .with_blacklist("^__.*")
            .unwrap();
        assert!(cfg.is_blacklisted("__consumer_offsets"));
        assert!(!cfg.is_blacklisted("orders"));
    }
}
