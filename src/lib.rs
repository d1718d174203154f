#![recursion_limit = "128"]
#![allow(dead_code)]

//! Topic metadata and partition-routing core for a Kafka-style client.
//!
//! This crate owns the part of a client that every producer and
//! consumer implementation sits on top of: the topic registry, each
//! topic's existence state machine, reconciling a topic's partition
//! array to what the cluster reports, tracking partition leadership,
//! routing produced messages (including the unassigned-partition
//! staging slot), and aging out messages that wait too long. Wire
//! protocol, network I/O, compression and consumer-group coordination
//! are out of scope (see `SPEC_FULL.md`).

#[macro_use]
extern crate log;
#[macro_use]
extern crate error_chain;
extern crate parking_lot;
extern crate rand;
extern crate regex;
#[macro_use]
extern crate bitflags;

#[cfg(test)]
extern crate pretty_env_logger;

#[macro_use]
pub mod errors;
pub mod broker;
pub mod client;
pub mod clock;
pub mod config;
pub mod delivery;
mod lock_order;
pub mod message;
pub mod partition;
pub mod partitioner;
pub mod refresher;
pub mod topic;

pub use client::{Client, ClientInner};
pub use config::{ClientConfig, ClientRole, Compression, TopicConfig};
pub use errors::{Error, ErrorKind, KafkaCode, Result};
pub use message::Message;
pub use partition::{Partition, PartitionId};
pub use topic::{PartitionMetadata, TopicMetadataResult, TopicRef, TopicState};
