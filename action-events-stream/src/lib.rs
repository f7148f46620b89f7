//! # Action Events Stream
//! Publishes action events onto the `event-action-<kind>` topic family and
//! consumes them under shared subscriptions with manual acknowledgment.
//! Transports are pluggable: Kafka for deployments and an in-memory bus for
//! tests and local runs.
pub mod action_topic;
pub mod config;
pub mod errors;
pub mod naming;
pub mod topic;
pub mod transport;

pub use action_topic::{action_topic_name, ActionEventsTopic, ACTION_TOPIC_PREFIX};
pub use config::{ConsumeConfig, StreamConfig};
pub use errors::{TopicError, TransportError};
pub use naming::{TopicAddress, TopicPattern};
pub use topic::{run_subscription, EventHandler, EventSubscription, Topic, DEFAULT_TOPIC_FILTER};
pub use transport::{
    KafkaConfig, KafkaTransport, MemoryTransport, MessageId, ReceivedMessage, Transport,
    TransportProducer, TransportSubscription,
};
