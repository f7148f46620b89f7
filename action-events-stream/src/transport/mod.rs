//! The pub/sub transport seam.
//!
//! A transport offers schema-bound producers for single topics and shared
//! subscriptions over topic patterns with manual acknowledgment. Several
//! handles subscribed under one subscription id compete for messages.
mod kafka;
mod memory;

use std::fmt;
use std::sync::Arc;

use action_events_shared::Schema;
use async_trait::async_trait;

use crate::errors::TransportError;
use crate::naming::{TopicAddress, TopicPattern};

pub use kafka::{KafkaConfig, KafkaTransport};
pub use memory::MemoryTransport;

/// Position of a message in the topic it was published to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId {
    pub topic: TopicAddress,
    pub partition: i32,
    pub offset: i64,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]@{}", self.topic, self.partition, self.offset)
    }
}

/// A message handed out by a subscription, pending acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub id: MessageId,
    pub payload: Vec<u8>,
    /// How many times this message was negatively acknowledged before.
    pub redelivery_count: u32,
}

/// Creates producers and subscriptions.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Creates a producer bound to one topic and schema.
    async fn create_producer(
        &self,
        topic: &TopicAddress,
        schema: &Schema,
    ) -> Result<Arc<dyn TransportProducer>, TransportError>;

    /// Opens a shared subscription over every topic matching `pattern`.
    async fn subscribe(
        &self,
        pattern: &TopicPattern,
        subscription_id: &str,
        schema: &Schema,
    ) -> Result<Box<dyn TransportSubscription>, TransportError>;
}

#[async_trait]
pub trait TransportProducer: Send + Sync {
    /// Publishes one payload. No key is set, so no ordering is implied
    /// between payloads.
    async fn send(&self, payload: &[u8]) -> Result<(), TransportError>;
}

#[async_trait]
pub trait TransportSubscription: Send + Sync {
    /// Waits for the next message.
    async fn receive(&self) -> Result<ReceivedMessage, TransportError>;

    /// Removes the message from the backlog of this subscription.
    async fn acknowledge(&self, message: &ReceivedMessage) -> Result<(), TransportError>;

    /// Returns the message to the backlog so it is delivered again.
    async fn negative_acknowledge(&self, message: &ReceivedMessage) -> Result<(), TransportError>;
}
