use action_events_shared::Notification;

use crate::errors::NotificationStoreError;

/// Result of handing a notification to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The notification was written.
    Inserted,
    /// A notification with the same uuid already exists; nothing was written.
    Duplicate,
}

/// Persists notifications derived from action events.
///
/// Deliveries are at-least-once, so `add` is called again for events that
/// were already handled. Implementations must treat a repeated uuid as a
/// successful no-op and report [`AddOutcome::Duplicate`].
#[async_trait::async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persists a notification once.
    ///
    /// # Arguments
    ///
    /// * `notification` - The notification to persist, keyed by its uuid
    ///
    /// # Returns
    ///
    /// * `Ok(AddOutcome)` - The notification is stored (now or previously)
    /// * `Err(NotificationStoreError)` - The write failed and may be retried
    async fn add(&self, notification: &Notification) -> Result<AddOutcome, NotificationStoreError>;
}
