use action_events_shared::SchemaError;
use thiserror::Error;

/// Errors raised by a pub/sub transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Kafka-related error.
    #[error("Kafka error: {0}")]
    KafkaError(String),

    /// The payload does not satisfy the schema the topic is bound to.
    #[error("Schema violation: {0}")]
    SchemaViolation(#[from] SchemaError),

    /// The transport can no longer deliver messages.
    #[error("Transport closed: {0}")]
    Closed(String),

    /// A message id that is not in flight was (n)acknowledged.
    #[error("Unknown message: {0}")]
    UnknownMessage(String),
}

impl TransportError {
    /// Create a Kafka error.
    pub fn kafka(msg: impl Into<String>) -> Self {
        Self::KafkaError(msg.into())
    }

    /// Create a closed error.
    pub fn closed(msg: impl Into<String>) -> Self {
        Self::Closed(msg.into())
    }
}

impl From<rdkafka::error::KafkaError> for TransportError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::KafkaError(err.to_string())
    }
}
