//! In-process transport for tests and local runs.
//!
//! Every topic is a single partition log. A new subscription replays the
//! existing log from the earliest message, handles sharing a subscription id
//! share one backlog, and negatively acknowledged messages go back to the
//! front of that backlog. Every waiting handle is woken on a new message and
//! re-checks the backlog.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use action_events_shared::Schema;
use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::debug;

use super::{MessageId, ReceivedMessage, Transport, TransportProducer, TransportSubscription};
use crate::errors::TransportError;
use crate::naming::{TopicAddress, TopicPattern};

#[derive(Default)]
struct Bus {
    log: Vec<(MessageId, Vec<u8>)>,
    next_offsets: HashMap<TopicAddress, i64>,
    subscriptions: HashMap<String, Arc<SharedSubscription>>,
}

struct SharedSubscription {
    pattern: TopicPattern,
    backlog: Mutex<Backlog>,
    notify: Notify,
}

#[derive(Default)]
struct Backlog {
    ready: VecDeque<ReceivedMessage>,
    in_flight: HashMap<MessageId, ReceivedMessage>,
}

impl SharedSubscription {
    fn backlog(&self) -> Result<MutexGuard<'_, Backlog>, TransportError> {
        self.backlog
            .lock()
            .map_err(|_| TransportError::closed("subscription backlog lock poisoned"))
    }

    fn enqueue(&self, message: ReceivedMessage) -> Result<(), TransportError> {
        self.backlog()?.ready.push_back(message);
        self.notify.notify_waiters();
        Ok(())
    }
}

/// Transport keeping every topic in memory. Clones share the same bus.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    bus: Arc<Mutex<Bus>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn bus(&self) -> Result<MutexGuard<'_, Bus>, TransportError> {
        self.bus
            .lock()
            .map_err(|_| TransportError::closed("memory bus lock poisoned"))
    }

    /// Appends a payload to a topic without schema validation.
    ///
    /// Lets tests put payloads on a topic that a regular producer would
    /// refuse.
    pub fn inject(&self, topic: &TopicAddress, payload: &[u8]) -> Result<MessageId, TransportError> {
        let mut bus = self.bus()?;
        let next_offset = bus.next_offsets.entry(topic.clone()).or_insert(0);
        let id = MessageId {
            topic: topic.clone(),
            partition: 0,
            offset: *next_offset,
        };
        *next_offset += 1;
        bus.log.push((id.clone(), payload.to_vec()));

        for shared in bus.subscriptions.values() {
            if shared.pattern.matches(topic) {
                shared.enqueue(ReceivedMessage {
                    id: id.clone(),
                    payload: payload.to_vec(),
                    redelivery_count: 0,
                })?;
            }
        }

        debug!(message_id = %id, "Published message");
        Ok(id)
    }

    /// Number of messages published to `topic`.
    pub fn published(&self, topic: &TopicAddress) -> usize {
        self.bus()
            .map(|bus| bus.log.iter().filter(|(id, _)| id.topic == *topic).count())
            .unwrap_or(0)
    }

    /// Whether a subscription named `subscription_id` has been opened.
    pub fn is_subscribed(&self, subscription_id: &str) -> bool {
        self.bus()
            .map(|bus| bus.subscriptions.contains_key(subscription_id))
            .unwrap_or(false)
    }

    /// Number of messages not yet acknowledged under `subscription_id`.
    pub fn pending(&self, subscription_id: &str) -> usize {
        let Ok(bus) = self.bus() else {
            return 0;
        };
        bus.subscriptions
            .get(subscription_id)
            .and_then(|shared| shared.backlog().ok().map(|b| b.ready.len() + b.in_flight.len()))
            .unwrap_or(0)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn create_producer(
        &self,
        topic: &TopicAddress,
        schema: &Schema,
    ) -> Result<Arc<dyn TransportProducer>, TransportError> {
        Ok(Arc::new(MemoryProducer {
            transport: self.clone(),
            topic: topic.clone(),
            schema: schema.clone(),
        }))
    }

    async fn subscribe(
        &self,
        pattern: &TopicPattern,
        subscription_id: &str,
        _schema: &Schema,
    ) -> Result<Box<dyn TransportSubscription>, TransportError> {
        let mut bus = self.bus()?;

        let existing = bus.subscriptions.get(subscription_id).cloned();
        let shared = match existing {
            Some(shared) => shared,
            None => {
                let mut backlog = Backlog::default();
                for (id, payload) in bus.log.iter().filter(|(id, _)| pattern.matches(&id.topic)) {
                    backlog.ready.push_back(ReceivedMessage {
                        id: id.clone(),
                        payload: payload.clone(),
                        redelivery_count: 0,
                    });
                }
                let shared = Arc::new(SharedSubscription {
                    pattern: pattern.clone(),
                    backlog: Mutex::new(backlog),
                    notify: Notify::new(),
                });
                bus.subscriptions
                    .insert(subscription_id.to_string(), shared.clone());
                shared
            }
        };

        Ok(Box::new(MemorySubscription { shared }))
    }
}

struct MemoryProducer {
    transport: MemoryTransport,
    topic: TopicAddress,
    schema: Schema,
}

#[async_trait]
impl TransportProducer for MemoryProducer {
    async fn send(&self, payload: &[u8]) -> Result<(), TransportError> {
        self.schema.validate_bytes(payload)?;
        self.transport.inject(&self.topic, payload)?;
        Ok(())
    }
}

struct MemorySubscription {
    shared: Arc<SharedSubscription>,
}

#[async_trait]
impl TransportSubscription for MemorySubscription {
    async fn receive(&self) -> Result<ReceivedMessage, TransportError> {
        loop {
            // register before checking so a wakeup between the two is not lost
            let notified = self.shared.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut backlog = self.shared.backlog()?;
                if let Some(message) = backlog.ready.pop_front() {
                    backlog.in_flight.insert(message.id.clone(), message.clone());
                    return Ok(message);
                }
            }
            notified.await;
        }
    }

    async fn acknowledge(&self, message: &ReceivedMessage) -> Result<(), TransportError> {
        self.shared
            .backlog()?
            .in_flight
            .remove(&message.id)
            .map(|_| ())
            .ok_or_else(|| TransportError::UnknownMessage(message.id.to_string()))
    }

    async fn negative_acknowledge(&self, message: &ReceivedMessage) -> Result<(), TransportError> {
        let mut backlog = self.shared.backlog()?;
        let mut message = backlog
            .in_flight
            .remove(&message.id)
            .ok_or_else(|| TransportError::UnknownMessage(message.id.to_string()))?;
        message.redelivery_count += 1;
        backlog.ready.push_front(message);
        drop(backlog);

        self.shared.notify.notify_waiters();
        Ok(())
    }
}
