//! Binding of action events to the `event-action-<kind>` topic family.

use std::collections::HashMap;
use std::sync::Arc;

use action_events_repository::{DirectoryError, DirectoryLookup};
use action_events_shared::{ActionEnvelope, ActionEvent, ActionKind, ActionRecord, Guid, Schema};
use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tokio::task::yield_now;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{ConsumeConfig, StreamConfig};
use crate::errors::TopicError;
use crate::naming::{TopicAddress, TopicPattern};
use crate::topic::{EventHandler, Topic, DEFAULT_TOPIC_FILTER};
use crate::transport::{ReceivedMessage, Transport, TransportProducer, TransportSubscription};

/// Prefix shared by every action topic name.
pub const ACTION_TOPIC_PREFIX: &str = "event-action-";

/// Topic name carrying events of one action kind.
pub fn action_topic_name(action: ActionKind) -> String {
    format!("{}{}", ACTION_TOPIC_PREFIX, action)
}

/// Name pattern for a topic filter over action kinds. `*` selects every kind.
pub fn action_topic_name_pattern(topic_filter: &str) -> String {
    let filter = if topic_filter == DEFAULT_TOPIC_FILTER {
        ".*"
    } else {
        topic_filter
    };
    format!("{}(?:{})", ACTION_TOPIC_PREFIX, filter)
}

/// What happens to a received message once it has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Ack,
    Nack,
}

enum Hydration {
    Ready(ActionEvent),
    Unresolved { role: &'static str, guid: Guid },
}

/// Publishes action events to, and consumes them from, per-kind topics.
pub struct ActionEventsTopic {
    transport: Arc<dyn Transport>,
    directory: Arc<dyn DirectoryLookup>,
    stream_config: StreamConfig,
    consume_config: ConsumeConfig,
    schema: Schema,
    producers: Mutex<HashMap<TopicAddress, Arc<dyn TransportProducer>>>,
}

impl ActionEventsTopic {
    pub fn new(
        transport: Arc<dyn Transport>,
        directory: Arc<dyn DirectoryLookup>,
        stream_config: StreamConfig,
    ) -> Self {
        Self {
            transport,
            directory,
            stream_config,
            consume_config: ConsumeConfig::default(),
            schema: Schema::action(),
            producers: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_consume_config(mut self, consume_config: ConsumeConfig) -> Self {
        self.consume_config = consume_config;
        self
    }

    /// Address of the topic carrying `action` events.
    pub fn topic_address(&self, action: ActionKind) -> TopicAddress {
        TopicAddress::new(&self.stream_config, action_topic_name(action))
    }

    pub fn topic_pattern(&self, topic_filter: &str) -> Result<TopicPattern, TopicError> {
        TopicPattern::new(&self.stream_config, action_topic_name_pattern(topic_filter))
    }

    /// Publishes an event, reporting why it failed.
    pub async fn try_send(&self, event: &ActionEvent) -> Result<(), TopicError> {
        let topic = self.topic_address(event.action());
        let producer = self.producer(&topic).await?;
        let payload = ActionEnvelope::from_event(event)?.encode()?;

        producer.send(&payload).await?;

        debug!(topic = %topic, "Published action event");
        Ok(())
    }

    /// Returns the cached producer for `topic`, creating it on first use.
    async fn producer(&self, topic: &TopicAddress) -> Result<Arc<dyn TransportProducer>, TopicError> {
        let mut producers = self.producers.lock().await;
        if let Some(producer) = producers.get(topic) {
            return Ok(producer.clone());
        }

        let producer = self.transport.create_producer(topic, &self.schema).await?;
        producers.insert(topic.clone(), producer.clone());
        Ok(producer)
    }

    /// Resolves the actor and entity of a decoded record.
    async fn hydrate(&self, record: ActionRecord) -> Result<Hydration, DirectoryError> {
        let Some(user) = self.directory.resolve(&record.user_guid).await? else {
            return Ok(Hydration::Unresolved {
                role: "user",
                guid: record.user_guid,
            });
        };
        let Some(entity) = self.directory.resolve(&record.entity.guid).await? else {
            return Ok(Hydration::Unresolved {
                role: "entity",
                guid: record.entity.guid,
            });
        };

        Ok(Hydration::Ready(
            ActionEvent::new(record.action, user, entity).with_action_data(record.action_data),
        ))
    }

    /// Nack while the message may still be redelivered, otherwise drop it.
    fn retry_or_drop(&self, message: &ReceivedMessage) -> Delivery {
        if message.redelivery_count >= self.consume_config.max_redeliveries {
            error!(
                message_id = %message.id,
                redelivery_count = message.redelivery_count,
                "Dropping message after maximum redeliveries"
            );
            Delivery::Ack
        } else {
            Delivery::Nack
        }
    }

    /// Decodes, hydrates and hands one message to `handler`.
    #[instrument(skip_all, fields(message_id = %message.id, redelivery_count = message.redelivery_count))]
    async fn process(&self, handler: &dyn EventHandler, message: &ReceivedMessage) -> Delivery {
        let envelope = match ActionEnvelope::decode(&message.payload, &self.schema) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(error = %e, "Failed to decode action envelope");
                return self.retry_or_drop(message);
            }
        };

        let record = match envelope.into_record() {
            Ok(record) => record,
            Err(e) if e.is_unknown_action() => {
                warn!(error = %e, "Skipping unknown action kind");
                return Delivery::Ack;
            }
            Err(e) => {
                error!(error = %e, "Invalid action envelope");
                return self.retry_or_drop(message);
            }
        };
        let action = record.action;

        let event = match self.hydrate(record).await {
            Ok(Hydration::Ready(event)) => event,
            Ok(Hydration::Unresolved { role, guid }) => {
                warn!(
                    action = %action,
                    role = role,
                    guid = %guid,
                    "Could not resolve action event reference"
                );
                return self.retry_or_drop(message);
            }
            Err(e) => {
                error!(action = %action, error = %e, "Directory lookup failed");
                return self.retry_or_drop(message);
            }
        };

        if handler.handle(event, message).await {
            Delivery::Ack
        } else {
            debug!(action = %action, "Handler did not accept event, requesting redelivery");
            Delivery::Nack
        }
    }

    /// Sleeps the nack backoff. Returns `true` if shutdown fired meanwhile.
    async fn backoff(&self, shutdown: &mut broadcast::Receiver<()>) -> bool {
        if self.consume_config.nack_backoff.is_zero() {
            // a redelivered message is ready at once, so give other tasks a turn
            yield_now().await;
            return false;
        }
        tokio::select! {
            biased;
            _ = shutdown.recv() => true,
            _ = sleep(self.consume_config.nack_backoff) => false,
        }
    }

    async fn settle(
        &self,
        subscription: &dyn TransportSubscription,
        message: &ReceivedMessage,
        delivery: Delivery,
    ) {
        let result = match delivery {
            Delivery::Ack => subscription.acknowledge(message).await,
            Delivery::Nack => subscription.negative_acknowledge(message).await,
        };
        if let Err(e) = result {
            error!(
                message_id = %message.id,
                delivery = ?delivery,
                error = %e,
                "Failed to settle message"
            );
        }
    }
}

#[async_trait]
impl Topic for ActionEventsTopic {
    #[instrument(skip_all, fields(action = %event.action()))]
    async fn send(&self, event: &ActionEvent) -> bool {
        match self.try_send(event).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to publish action event");
                false
            }
        }
    }

    async fn consume(
        &self,
        subscription_id: &str,
        handler: &dyn EventHandler,
        topic_filter: &str,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), TopicError> {
        let pattern = self.topic_pattern(topic_filter)?;
        let subscription = self
            .transport
            .subscribe(&pattern, subscription_id, &self.schema)
            .await?;

        info!(
            pattern = %pattern,
            subscription_id = %subscription_id,
            "Consuming action events"
        );

        loop {
            let message = tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    info!(subscription_id = %subscription_id, "Consumer received shutdown signal");
                    return Ok(());
                }
                received = subscription.receive() => received?,
            };

            let delivery = self.process(handler, &message).await;
            self.settle(subscription.as_ref(), &message, delivery).await;

            if delivery == Delivery::Nack && self.backoff(&mut shutdown).await {
                info!(subscription_id = %subscription_id, "Consumer received shutdown signal");
                return Ok(());
            }
        }
    }
}
