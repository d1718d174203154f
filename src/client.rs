//! The top-level client facade: owns the topic registry plus the
//! external collaborators every component below it needs, and is the
//! client level of the three-level lock hierarchy (spec.md S5). Shaped
//! after the teacher's `Client(Arc<Inner>)` handle pattern.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::broker::BrokerManager;
use crate::clock::{Clock, SystemClock};
use crate::config::{ClientConfig, TopicConfig};
use crate::delivery::DeliveryReportSink;
use crate::errors::{ErrorKind, Result};
use crate::message::Message;
use crate::partition::PartitionId;
use crate::refresher::MetadataRefresher;
use crate::topic::{self, TopicMetadataResult, TopicRef, TopicRegistry, TopicState};

pub struct ClientInner {
    pub config: ClientConfig,
    registry: TopicRegistry,
    brokers: Arc<dyn BrokerManager>,
    delivery: Arc<dyn DeliveryReportSink>,
    refresher: Arc<dyn MetadataRefresher>,
    clock: Arc<dyn Clock>,
    terminating: AtomicBool,
}

#[derive(Clone)]
pub struct Client(Arc<ClientInner>);

impl Deref for Client {
    type Target = ClientInner;

    fn deref(&self) -> &ClientInner {
        &self.0
    }
}

impl Client {
    pub fn new(
        config: ClientConfig,
        brokers: Arc<dyn BrokerManager>,
        delivery: Arc<dyn DeliveryReportSink>,
        refresher: Arc<dyn MetadataRefresher>,
    ) -> Self {
        Client::with_clock(config, brokers, delivery, refresher, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(
        config: ClientConfig,
        brokers: Arc<dyn BrokerManager>,
        delivery: Arc<dyn DeliveryReportSink>,
        refresher: Arc<dyn MetadataRefresher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Client(Arc::new(ClientInner {
            config,
            registry: TopicRegistry::new(),
            brokers,
            delivery,
            refresher,
            clock,
            terminating: AtomicBool::new(false),
        }))
    }
}

impl ClientInner {
    pub fn is_terminating(&self) -> bool {
        self.terminating.load(Ordering::SeqCst)
    }

    pub fn find_or_create_topic(&self, name: &str, config: TopicConfig) -> Result<TopicRef> {
        if self.config.is_blacklisted(name) {
            bail!(ErrorKind::InvalidArgument("topic name is blacklisted"));
        }
        self.registry.find_or_create(name, config)
    }

    /// Routes a produced message to a partition, or to UA if the
    /// partitioner or the forced partition id can't be resolved yet
    /// (spec.md S4.5).
    pub fn produce(&self, topic_name: &str, config: TopicConfig, message: Message) -> Result<()> {
        if self.is_terminating() {
            bail!(ErrorKind::InvalidArgument("client is shutting down"));
        }

        let topic = self.find_or_create_topic(topic_name, config)?;

        match message.forced_partition {
            Some(id) => match topic.partition(id) {
                Some(partition) => partition.enqueue_message(message),
                None => topic.ua.enqueue_message(message),
            },
            None => {
                let partition_cnt = topic.partition_count() as i32;
                let routed = if partition_cnt == 0 {
                    None
                } else {
                    topic
                        .config
                        .partitioner
                        .partition(&message, partition_cnt)
                        .ok()
                        .and_then(|id| topic.partition(id))
                };
                match routed {
                    Some(partition) => partition.enqueue_message(message),
                    None => topic.ua.enqueue_message(message),
                }
            }
        }

        if topic.state() == TopicState::Unknown {
            self.refresher.query_leader(topic_name);
        }
        Ok(())
    }

    /// Marks a partition id as consumer-desired (spec.md S4.6).
    pub fn subscribe_partition(
        &self,
        topic_name: &str,
        config: TopicConfig,
        partition: PartitionId,
    ) -> Result<()> {
        let topic = self.find_or_create_topic(topic_name, config)?;
        topic.desired_link(partition);
        if topic.state() == TopicState::Unknown {
            self.refresher.query_leader(topic_name);
        }
        Ok(())
    }

    pub fn unsubscribe_partition(&self, topic_name: &str, partition: PartitionId) {
        if let Some(topic) = self.registry.find(topic_name) {
            topic.desired_unlink(partition);
        }
    }

    /// Applies a metadata response for one topic (S4.2-S4.6), delivering
    /// any message that failed permanently as a result.
    pub fn apply_topic_metadata(&self, topic_name: &str, result: TopicMetadataResult) {
        let topic = match self.registry.find(topic_name) {
            Some(topic) => topic,
            None => return,
        };

        let (failed, query_leader) = topic::apply_topic_metadata(
            &topic,
            result,
            self.config.role,
            self.is_terminating(),
            self.clock.now(),
            self.brokers.as_ref(),
            topic.config.partitioner.as_ref(),
        );

        for (message, error) in failed {
            self.delivery.deliver(topic_name, vec![message], error);
        }

        if query_leader {
            self.refresher.query_leader(topic_name);
        }
    }

    /// C7: sweeps every registered topic for timed-out messages.
    pub fn scan(&self) {
        let now = self.clock.now();
        for topic in self.registry.all() {
            topic::scan(
                &topic,
                now,
                self.config.metadata_refresh_interval_micros,
                self.refresher.as_ref(),
                self.delivery.as_ref(),
            );
        }
    }

    /// Tears down every topic's partitions without producing delivery
    /// reports (spec.md S9 supplement, grounded in
    /// `rd_kafka_topic_partitions_remove`): once a client is shutting
    /// down, in-flight messages have nowhere meaningful to be delivered.
    pub fn shutdown(&self) {
        self.terminating.store(true, Ordering::SeqCst);
        for topic in self.registry.all() {
            for partition in topic.partitions() {
                partition.take_all_messages();
                partition.delegate(None);
            }
            topic.ua.take_all_messages();
            self.registry.release(&topic.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::StaticBrokerManager;
    use crate::clock::ManualClock;
    use crate::delivery::ChannelDeliveryReportSink;
    use crate::refresher::RecordingRefresher;
    use crate::topic::PartitionMetadata;

    fn test_client() -> (Client, std::sync::mpsc::Receiver<crate::delivery::DeliveryReport>, ManualClock) {
        let (sink, rx) = ChannelDeliveryReportSink::new();
        let clock = ManualClock::new();
        let client = Client::with_clock(
            ClientConfig::new(crate::config::ClientRole::Producer),
            Arc::new(StaticBrokerManager::new()),
            Arc::new(sink),
            Arc::new(RecordingRefresher::new()),
            Arc::new(clock.clone()),
        );
        (client, rx, clock)
    }

    #[test]
    fn produce_before_metadata_stages_in_ua() {
        let (client, _rx, _clock) = test_client();
        client
            .produce("orders", TopicConfig::default(), Message::new(b"hi".to_vec(), 0, 1_000))
            .unwrap();

        let topic = client.registry.find("orders").unwrap();
        assert_eq!(topic.ua.message_count(), 1);
    }

    #[test]
    fn metadata_then_scan_flushes_and_times_out() {
        let (client, rx, clock) = test_client();
        client
            .produce("orders", TopicConfig::default(), Message::new(b"hi".to_vec(), 0, 500))
            .unwrap();

        client.apply_topic_metadata(
            "orders",
            TopicMetadataResult::Exists {
                partitions: vec![PartitionMetadata { id: 0, leader: None }],
            },
        );

        let topic = client.registry.find("orders").unwrap();
        assert_eq!(topic.partition(0).unwrap().message_count(), 1);

        clock.advance(1_000);
        client.scan();

        let report = rx.try_recv().expect("expected a timed-out delivery report");
        assert_eq!(report.messages.len(), 1);
    }

    #[test]
    fn shutdown_stops_further_production() {
        let (client, _rx, _clock) = test_client();
        client.shutdown();
        let err = client
            .produce("orders", TopicConfig::default(), Message::new(b"hi".to_vec(), 0, 1_000))
            .unwrap_err();
        assert!(format!("{}", err).contains("shutting down"));
    }
}
