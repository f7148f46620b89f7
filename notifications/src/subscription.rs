//! The `notifications` subscription on the action event stream.
use std::sync::Arc;

use action_events_repository::NotificationStore;
use action_events_shared::ActionEvent;
use action_events_stream::EventSubscription;
use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use crate::classifier::{Classification, NotificationClassifier};

/// Consumer group of the notification classifier.
pub const NOTIFICATIONS_SUBSCRIPTION_ID: &str = "notifications";

/// Notifications want every action kind.
pub const NOTIFICATIONS_TOPIC_FILTER: &str = ".*";

/// Classifies every action event and persists the resulting notifications.
pub struct NotificationsSubscription {
    classifier: NotificationClassifier,
    store: Arc<dyn NotificationStore>,
}

impl NotificationsSubscription {
    pub fn new(classifier: NotificationClassifier, store: Arc<dyn NotificationStore>) -> Self {
        Self { classifier, store }
    }
}

#[async_trait]
impl EventSubscription for NotificationsSubscription {
    fn subscription_id(&self) -> &str {
        NOTIFICATIONS_SUBSCRIPTION_ID
    }

    fn topic_filter(&self) -> &str {
        NOTIFICATIONS_TOPIC_FILTER
    }

    /// Returns `false` only when persisting failed, so the event is
    /// redelivered. Every other outcome is final.
    #[instrument(skip_all, fields(action = %event.action(), user_guid = %event.user().guid))]
    async fn consume(&self, event: &ActionEvent) -> bool {
        let notification = match self.classifier.classify(event) {
            Ok(Classification::Notify(notification)) => notification,
            Ok(Classification::Suppressed) => {
                info!("Skipping as owner is sender");
                return true;
            }
            Ok(Classification::Disabled) => {
                debug!("Notifications for this action are disabled");
                return true;
            }
            Ok(Classification::Unmapped) => {
                debug!("No notification for this action");
                return true;
            }
            Err(e) => {
                error!(error = %e, "Failed to classify action event");
                return true;
            }
        };

        match self.store.add(&notification).await {
            Ok(outcome) => {
                info!(
                    notification_uuid = %notification.uuid,
                    notification_type = %notification.notification_type,
                    outcome = ?outcome,
                    "{} {} saved",
                    notification.uuid,
                    notification.notification_type
                );
                true
            }
            Err(e) => {
                error!(
                    notification_uuid = %notification.uuid,
                    error = %e,
                    "Failed to save notification"
                );
                false
            }
        }
    }
}
