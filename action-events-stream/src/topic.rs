//! The transport-independent topic contract.

use action_events_shared::ActionEvent;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

use crate::errors::TopicError;
use crate::transport::ReceivedMessage;

/// Topic filter selecting every topic of a family.
pub const DEFAULT_TOPIC_FILTER: &str = "*";

/// Publish/subscribe access to a family of event topics.
#[async_trait]
pub trait Topic: Send + Sync {
    /// Publishes one event.
    ///
    /// Returns `false` when the transport does not confirm the publish. No
    /// retry is attempted; the caller decides whether to try again.
    async fn send(&self, event: &ActionEvent) -> bool;

    /// Receives events from every topic matching `topic_filter` under the
    /// shared subscription `subscription_id` until `shutdown` fires.
    ///
    /// Each message is acknowledged when `handler` returns `true` and
    /// redelivered later otherwise, so handlers must be idempotent.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Shutdown was requested
    /// * `Err(TopicError)` - The subscription could not be opened or the
    ///   transport failed
    async fn consume(
        &self,
        subscription_id: &str,
        handler: &dyn EventHandler,
        topic_filter: &str,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), TopicError>;
}

/// Callback invoked for every event received by [`Topic::consume`].
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Returns `true` once the event is fully handled.
    async fn handle(&self, event: ActionEvent, message: &ReceivedMessage) -> bool;
}

/// A named consumer of action events.
#[async_trait]
pub trait EventSubscription: Send + Sync {
    /// Consumer group shared by every process running this subscription.
    fn subscription_id(&self) -> &str;

    fn topic_filter(&self) -> &str {
        DEFAULT_TOPIC_FILTER
    }

    /// Handles one event. Returning `false` requests redelivery.
    async fn consume(&self, event: &ActionEvent) -> bool;
}

struct SubscriptionHandler<'a, S: ?Sized>(&'a S);

#[async_trait]
impl<'a, S: EventSubscription + ?Sized> EventHandler for SubscriptionHandler<'a, S> {
    async fn handle(&self, event: ActionEvent, _message: &ReceivedMessage) -> bool {
        self.0.consume(&event).await
    }
}

/// Runs `subscription` against `topic` until shutdown.
pub async fn run_subscription<T, S>(
    topic: &T,
    subscription: &S,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), TopicError>
where
    T: Topic + ?Sized,
    S: EventSubscription + ?Sized,
{
    info!(
        subscription_id = %subscription.subscription_id(),
        topic_filter = %subscription.topic_filter(),
        "Starting subscription"
    );

    topic
        .consume(
            subscription.subscription_id(),
            &SubscriptionHandler(subscription),
            subscription.topic_filter(),
            shutdown,
        )
        .await
}
