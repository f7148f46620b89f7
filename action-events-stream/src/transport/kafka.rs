//! Kafka transport.
//!
//! Topic addresses map to Kafka topics named `<tenant>.<namespace>.<name>`,
//! a subscription id is a consumer group and patterns use librdkafka regex
//! subscriptions. A send completes only once the broker reports delivery.
//! Acknowledging commits the next offset; negatively acknowledging seeks the
//! partition back so the message is fetched again.

use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_events_shared::Schema;
use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer, StreamConsumer},
    message::Message as KafkaMessage,
    producer::{FutureProducer, FutureRecord},
    Offset, TopicPartitionList,
};
use tracing::{debug, info};

use super::{MessageId, ReceivedMessage, Transport, TransportProducer, TransportSubscription};
use crate::errors::TransportError;
use crate::naming::{TopicAddress, TopicPattern};

/// Default Kafka broker address.
const DEFAULT_KAFKA_BROKER: &str = "localhost:9092";

/// Default client id.
const DEFAULT_CLIENT_ID: &str = "action-events";

/// How long a send may wait for room in a full producer queue.
const QUEUE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a seek may block.
const SEEK_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings shared by producers and consumers.
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Kafka broker address (e.g., "localhost:9092")
    pub broker: String,
    pub client_id: String,
    /// SASL username (enables SASL/SSL together with the password)
    pub username: Option<String>,
    pub password: Option<String>,
    /// Custom CA certificate in PEM format
    pub ssl_ca_pem: Option<String>,
}

impl KafkaConfig {
    pub fn new(broker: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            client_id: client_id.into(),
            username: None,
            password: None,
            ssl_ca_pem: None,
        }
    }

    /// Reads the connection settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KAFKA_BROKER`: Broker address (default: localhost:9092)
    /// - `KAFKA_CLIENT_ID`: Client id (default: action-events)
    /// - `KAFKA_USERNAME`: SASL username (optional)
    /// - `KAFKA_PASSWORD`: SASL password (optional)
    /// - `KAFKA_SSL_CA_PEM`: Custom CA cert in PEM format (optional)
    pub fn from_env() -> Self {
        Self {
            broker: env::var("KAFKA_BROKER").unwrap_or_else(|_| DEFAULT_KAFKA_BROKER.to_string()),
            client_id: env::var("KAFKA_CLIENT_ID").unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string()),
            username: env::var("KAFKA_USERNAME").ok(),
            password: env::var("KAFKA_PASSWORD").ok(),
            ssl_ca_pem: env::var("KAFKA_SSL_CA_PEM").ok(),
        }
    }

    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    fn client_config(&self) -> ClientConfig {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", &self.broker)
            .set("client.id", &self.client_id);

        // SASL/SSL for managed Kafka, plaintext for local development
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            client_config
                .set("security.protocol", "SASL_SSL")
                .set("sasl.mechanisms", "PLAIN")
                .set("sasl.username", username)
                .set("sasl.password", password);

            if let Some(ca_pem) = &self.ssl_ca_pem {
                client_config.set("ssl.ca.pem", ca_pem);
            }
        }

        client_config
    }
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_KAFKA_BROKER, DEFAULT_CLIENT_ID)
    }
}

/// Transport over a Kafka cluster.
pub struct KafkaTransport {
    config: KafkaConfig,
}

impl KafkaTransport {
    pub fn new(config: KafkaConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Transport for KafkaTransport {
    async fn create_producer(
        &self,
        topic: &TopicAddress,
        schema: &Schema,
    ) -> Result<Arc<dyn TransportProducer>, TransportError> {
        let producer: FutureProducer = self
            .config
            .client_config()
            .set("compression.type", "zstd")
            .set("message.timeout.ms", "5000")
            .set("queue.buffering.max.messages", "100000")
            .set("queue.buffering.max.kbytes", "1048576")
            .create()?;

        info!(topic = %topic, kafka_topic = %topic.kafka_topic(), "Created Kafka producer");

        Ok(Arc::new(KafkaProducer {
            producer,
            topic: topic.kafka_topic(),
            schema: schema.clone(),
        }))
    }

    async fn subscribe(
        &self,
        pattern: &TopicPattern,
        subscription_id: &str,
        schema: &Schema,
    ) -> Result<Box<dyn TransportSubscription>, TransportError> {
        let consumer: StreamConsumer = self
            .config
            .client_config()
            .set("group.id", subscription_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .set("topic.metadata.refresh.interval.ms", "30000")
            .create()?;

        let regex = pattern.kafka_regex();
        consumer.subscribe(&[regex.as_str()])?;

        info!(
            pattern = %pattern,
            kafka_regex = %regex,
            subscription_id = %subscription_id,
            "Subscribed to Kafka topic pattern"
        );

        Ok(Box::new(KafkaSubscription {
            consumer,
            pattern: pattern.clone(),
            schema: schema.clone(),
            redeliveries: Mutex::new(HashMap::new()),
        }))
    }
}

struct KafkaProducer {
    producer: FutureProducer,
    topic: String,
    schema: Schema,
}

#[async_trait]
impl TransportProducer for KafkaProducer {
    async fn send(&self, payload: &[u8]) -> Result<(), TransportError> {
        self.schema.validate_bytes(payload)?;

        // resolves once the broker has acknowledged or rejected the record
        let record = FutureRecord::<(), [u8]>::to(&self.topic).payload(payload);
        let delivery = self
            .producer
            .send(record, QUEUE_TIMEOUT)
            .await
            .map_err(|(e, _)| e)?;

        debug!(topic = %self.topic, delivery = ?delivery, "Delivered message to Kafka");
        Ok(())
    }
}

type PartitionOffset = (String, i32, i64);

struct KafkaSubscription {
    consumer: StreamConsumer,
    pattern: TopicPattern,
    schema: Schema,
    redeliveries: Mutex<HashMap<PartitionOffset, u32>>,
}

impl KafkaSubscription {
    fn key(message: &ReceivedMessage) -> PartitionOffset {
        (
            message.id.topic.kafka_topic(),
            message.id.partition,
            message.id.offset,
        )
    }

    fn redeliveries(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<PartitionOffset, u32>>, TransportError> {
        self.redeliveries
            .lock()
            .map_err(|_| TransportError::closed("redelivery counter lock poisoned"))
    }
}

#[async_trait]
impl TransportSubscription for KafkaSubscription {
    async fn receive(&self) -> Result<ReceivedMessage, TransportError> {
        let msg = self.consumer.recv().await?;

        let topic = self
            .pattern
            .address_from_kafka_topic(msg.topic())
            .ok_or_else(|| {
                TransportError::kafka(format!("Topic {} is outside {}", msg.topic(), self.pattern))
            })?;
        let key = (msg.topic().to_string(), msg.partition(), msg.offset());
        let redelivery_count = self.redeliveries()?.get(&key).copied().unwrap_or(0);

        debug!(
            topic = %msg.topic(),
            partition = msg.partition(),
            offset = msg.offset(),
            redelivery_count = redelivery_count,
            schema = self.schema.name,
            "Received message from Kafka"
        );

        Ok(ReceivedMessage {
            id: MessageId {
                topic,
                partition: msg.partition(),
                offset: msg.offset(),
            },
            payload: msg.payload().unwrap_or_default().to_vec(),
            redelivery_count,
        })
    }

    async fn acknowledge(&self, message: &ReceivedMessage) -> Result<(), TransportError> {
        let (topic, partition, offset) = Self::key(message);

        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(&topic, partition, Offset::Offset(offset + 1))?;
        self.consumer.commit(&tpl, CommitMode::Async)?;

        self.redeliveries()?.remove(&(topic, partition, offset));
        Ok(())
    }

    async fn negative_acknowledge(&self, message: &ReceivedMessage) -> Result<(), TransportError> {
        let key = Self::key(message);

        self.consumer
            .seek(&key.0, key.1, Offset::Offset(key.2), SEEK_TIMEOUT)?;

        *self.redeliveries()?.entry(key).or_insert(0) += 1;
        Ok(())
    }
}
