//! The topic module tree: registry (C1), topic entity and state machine
//! (C2/C3), partition-count reconciler (C4), leader updater (C5), UA
//! flusher (C6), periodic scanner (C7) and availability probe (C8), plus
//! the metadata-apply entry point that drives C3-C6 together.

mod availability;
mod leader;
mod metadata_apply;
mod reconcile;
mod registry;
mod scanner;
mod state;
mod ua;

pub use availability::partition_available;
pub use leader::LeaderChange;
pub use metadata_apply::{apply_topic_metadata, PartitionMetadata, TopicMetadataResult};
pub use registry::TopicRegistry;
pub use scanner::scan;
pub use state::{TopicInner, TopicRef, TopicState};
pub use ua::flush_ua;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{Broker, BrokerManager, StaticBrokerManager};
    use crate::config::{ClientRole, TopicConfig};
    use crate::errors::KafkaCode;
    use crate::message::Message;
    use crate::partitioner::DefaultPartitioner;

    fn exists(partitions: Vec<(i32, Option<i32>)>) -> TopicMetadataResult {
        TopicMetadataResult::Exists {
            partitions: partitions
                .into_iter()
                .map(|(id, leader)| PartitionMetadata { id, leader })
                .collect(),
        }
    }

    #[test]
    fn create_topic_starts_unknown() {
        let topic = TopicInner::new("orders".to_owned(), TopicConfig::default());
        assert_eq!(topic.state(), TopicState::Unknown);
        assert_eq!(topic.partition_count(), 0);
    }

    #[test]
    fn metadata_response_creates_partitions_and_resolves_leaders() {
        let topic = TopicInner::new("orders".to_owned(), TopicConfig::default());
        let brokers = StaticBrokerManager::new();
        brokers.insert(Broker::new(1, "broker-a", 9092));
        let partitioner = DefaultPartitioner::new();

        let (failed, _) = apply_topic_metadata(
            &topic,
            exists(vec![(0, Some(1)), (1, Some(1))]),
            ClientRole::Producer,
            false,
            0,
            &brokers,
            &partitioner,
        );

        assert!(failed.is_empty());
        assert_eq!(topic.state(), TopicState::Exists);
        assert_eq!(topic.partition_count(), 2);
        assert!(topic.partition(0).unwrap().current_leader().is_some());
        assert!(partition_available(&topic, 0, &brokers));
        assert!(!partition_available(&topic, 99, &brokers));
    }

    #[test]
    fn unknown_topic_error_propagates_and_clears_partitions() {
        let topic = TopicInner::new("ghost".to_owned(), TopicConfig::default());
        let brokers = StaticBrokerManager::new();
        let partitioner = DefaultPartitioner::new();

        apply_topic_metadata(
            &topic,
            exists(vec![(0, None)]),
            ClientRole::Consumer,
            false,
            0,
            &brokers,
            &partitioner,
        );
        topic.desired_link(0);
        topic.desired_link(3);
        assert_eq!(topic.partition_count(), 1);

        apply_topic_metadata(
            &topic,
            TopicMetadataResult::Error(KafkaCode::UnknownTopicOrPartition),
            ClientRole::Consumer,
            false,
            0,
            &brokers,
            &partitioner,
        );

        assert_eq!(topic.state(), TopicState::NotExists);
        assert_eq!(topic.partition_count(), 0);
        // Both previously-desired ids (0, now parked, and 3, never materialized)
        // get the NotExists notification.
        assert!(!topic.desired_get(0).unwrap().take_notifications().is_empty());
        assert!(!topic.desired_get(3).unwrap().take_notifications().is_empty());
    }

    #[test]
    fn zero_partitions_with_no_error_does_not_mark_topic_gone() {
        let topic = TopicInner::new("orders".to_owned(), TopicConfig::default());
        let brokers = StaticBrokerManager::new();
        let partitioner = DefaultPartitioner::new();

        apply_topic_metadata(
            &topic,
            exists(vec![]),
            ClientRole::Producer,
            false,
            0,
            &brokers,
            &partitioner,
        );

        assert_eq!(topic.state(), TopicState::Unknown);
        assert_eq!(topic.partition_count(), 0);
    }

    #[test]
    fn leader_not_available_leaves_partition_array_untouched() {
        let topic = TopicInner::new("orders".to_owned(), TopicConfig::default());
        let brokers = StaticBrokerManager::new();
        let partitioner = DefaultPartitioner::new();

        let (_, query_leader) = apply_topic_metadata(
            &topic,
            exists(vec![(0, None)]),
            ClientRole::Producer,
            false,
            0,
            &brokers,
            &partitioner,
        );
        assert!(query_leader);
        apply_topic_metadata(
            &topic,
            TopicMetadataResult::Error(KafkaCode::LeaderNotAvailable),
            ClientRole::Producer,
            false,
            0,
            &brokers,
            &partitioner,
        );

        assert_eq!(topic.state(), TopicState::Exists);
        assert_eq!(topic.partition_count(), 1);
    }

    #[test]
    fn desired_partition_survives_shrink_and_is_reused_on_grow() {
        let topic = TopicInner::new("logs".to_owned(), TopicConfig::default());
        let brokers = StaticBrokerManager::new();
        let partitioner = DefaultPartitioner::new();

        apply_topic_metadata(
            &topic,
            exists(vec![(0, None), (1, None)]),
            ClientRole::Consumer,
            false,
            0,
            &brokers,
            &partitioner,
        );
        topic.partition(1).unwrap().set_desired(true);

        apply_topic_metadata(
            &topic,
            exists(vec![(0, None)]),
            ClientRole::Consumer,
            false,
            0,
            &brokers,
            &partitioner,
        );
        assert_eq!(topic.partition_count(), 1);
        assert!(topic.desired_get(1).is_some());
        assert!(topic.desired_get(1).unwrap().is_unknown());

        apply_topic_metadata(
            &topic,
            exists(vec![(0, None), (1, None)]),
            ClientRole::Consumer,
            false,
            0,
            &brokers,
            &partitioner,
        );
        let revived = topic.partition(1).unwrap();
        assert!(!revived.is_unknown());
        assert!(topic.desired_get(1).is_none());
    }

    #[test]
    fn ua_flush_routes_forced_partition_and_fails_out_of_range_once_confirmed() {
        let topic = TopicInner::new("orders".to_owned(), TopicConfig::default());
        let brokers = StaticBrokerManager::new();
        let partitioner = DefaultPartitioner::new();

        apply_topic_metadata(
            &topic,
            exists(vec![(0, None)]),
            ClientRole::Producer,
            false,
            0,
            &brokers,
            &partitioner,
        );
        topic
            .ua
            .enqueue_message(Message::new(b"oob".to_vec(), 0, 1_000).with_forced_partition(7));

        let failed = flush_ua(&topic, &partitioner);
        assert_eq!(failed.len(), 1);
    }

    #[test]
    fn topic_vanishing_drains_partitions_into_ua_and_fails_as_unknown_partition() {
        let topic = TopicInner::new("orders".to_owned(), TopicConfig::default());
        let brokers = StaticBrokerManager::new();
        let partitioner = DefaultPartitioner::new();

        apply_topic_metadata(
            &topic,
            exists(vec![(0, None), (1, None)]),
            ClientRole::Producer,
            false,
            0,
            &brokers,
            &partitioner,
        );
        topic.partition(0).unwrap().enqueue_messages(vec![
            Message::new(b"a".to_vec(), 0, 1_000),
            Message::new(b"b".to_vec(), 0, 1_000),
        ]);
        topic
            .partition(1)
            .unwrap()
            .enqueue_message(Message::new(b"c".to_vec(), 0, 1_000));

        let (failed, _) = apply_topic_metadata(
            &topic,
            exists(vec![]),
            ClientRole::Producer,
            false,
            0,
            &brokers,
            &partitioner,
        );

        assert_eq!(topic.state(), TopicState::Exists);
        assert_eq!(topic.partition_count(), 0);
        assert_eq!(topic.ua.message_count(), 0);
        assert_eq!(failed.len(), 3);
        assert!(failed
            .iter()
            .all(|(_, err)| matches!(err, crate::errors::ErrorKind::UnknownPartition(_, _))));
    }

    #[test]
    fn metadata_naming_an_absent_partition_signals_query_leader() {
        let topic = TopicInner::new("orders".to_owned(), TopicConfig::default());
        let brokers = StaticBrokerManager::new();
        let partitioner = DefaultPartitioner::new();

        // The reconciler grows the array to `new_cnt` contiguous ids (here
        // 0 and 1), but this response names id 5 -- an inconsistent
        // metadata reply the array was never sized to hold. C5 must flag
        // that as leader-unknown rather than silently skip it.
        let (_, query_leader) = apply_topic_metadata(
            &topic,
            exists(vec![(0, None), (5, None)]),
            ClientRole::Producer,
            false,
            0,
            &brokers,
            &partitioner,
        );
        assert!(topic.partition(5).is_none());
        assert!(query_leader);
    }
}
