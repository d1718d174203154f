/// Various errors reported by a remote Kafka server.
///
/// We use numeric codes to indicate what problem occurred on the server.
/// These can be translated by the client into exceptions or
/// whatever the appropriate error handling mechanism in the client language.
///
/// See also [Kafka Errors](http://kafka.apache.org/protocol.html)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KafkaCode {
    /// The server experienced an unexpected error when processing the request
    Unknown = -1,
    None = 0,
    /// The requested offset is outside the range of offsets
    /// maintained by the server for the given topic/partition
    OffsetOutOfRange = 1,
    /// This indicates that a message contents does not match its CRC
    CorruptMessage = 2,
    /// This request is for a topic or partition that does not exist
    /// on this broker.
    UnknownTopicOrPartition = 3,
    /// The message has a negative size
    InvalidMessageSize = 4,
    /// This error is thrown if we are in the middle of a leadership
    /// election and there is currently no leader for this partition
    /// and hence it is unavailable for writes.
    LeaderNotAvailable = 5,
    /// This error is thrown if the client attempts to send messages
    /// to a replica that is not the leader for some partition. It
    /// indicates that the clients metadata is out of date.
    NotLeaderForPartition = 6,
    /// This error is thrown if the request exceeds the user-specified
    /// time limit in the request.
    RequestTimedOut = 7,
    /// This is not a client facing error and is used mostly by tools
    /// when a broker is not alive.
    BrokerNotAvailable = 8,
    /// The server has a configurable maximum message size to avoid
    /// unbounded memory allocation. This error is thrown if the
    /// client attempt to produce a message larger than this maximum.
    MessageSizeTooLarge = 10,
    /// For a request which attempts to access an invalid topic
    /// (e.g. one which has an illegal name), or if an attempt is made
    /// to write to an internal topic (such as the consumer offsets
    /// topic).
    InvalidTopic = 17,
    /// Topic with this name already exists.
    TopicAlreadyExists = 36,
    /// Number of partitions is invalid.
    InvalidPartitions = 37,
}

error_chain!{
    foreign_links {
        IoError(::std::io::Error);
        RegexError(::regex::Error);
    }

    errors {
        /// Name missing or too long on topic creation (spec.md S7, InvalidArgument).
        InvalidArgument(reason: &'static str) {
            description("invalid argument")
            display("invalid argument: {}", reason)
        }

        /// A remote error code, passed through from metadata application.
        KafkaError(code: KafkaCode) {
            description("kafka error")
            display("kafka error: {:?}", code)
        }

        /// Topic transitioned to NotExists; producer messages and consumer
        /// `desired` notifications fail with this.
        UnknownTopic(topic: String) {
            description("unknown topic")
            display("unknown topic: {}", topic)
        }

        /// Partition vanished from the cluster view, or a message named an
        /// out-of-range forced partition id.
        UnknownPartition(topic: String, partition: i32) {
            description("unknown partition")
            display("unknown partition: {}[{}]", topic, partition)
        }

        /// The scanner aged a message out of a partition queue (spec.md S4.7).
        MessageTimedOut(topic: String, partition: i32) {
            description("message timed out")
            display("message timed out: {}[{}]", topic, partition)
        }

        /// No broker handle could be resolved for a given node id.
        BrokerNotFound(node_id: i32) {
            description("broker not found")
            display("broker not found: {}", node_id)
        }

        /// C5 could not resolve a leader for a partition: either the
        /// candidate broker wasn't usable, or the partition id wasn't even
        /// present in the metadata response (spec.md S4.4).
        LeaderUnknown(topic: String, partition: i32) {
            description("leader unknown")
            display("leader unknown: {}[{}]", topic, partition)
        }
    }
}
