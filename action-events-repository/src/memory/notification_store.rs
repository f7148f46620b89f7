use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use action_events_shared::Notification;
use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::NotificationStoreError;
use crate::interfaces::{AddOutcome, NotificationStore};

/// Notification store keeping everything in a map keyed by uuid.
///
/// The store can be switched into a failing mode to exercise redelivery.
#[derive(Default)]
pub struct MemoryNotificationStore {
    notifications: RwLock<HashMap<Uuid, Notification>>,
    failing: AtomicBool,
    attempts: AtomicUsize,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `add` fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.notifications.read().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, uuid: &Uuid) -> Option<Notification> {
        self.notifications
            .read()
            .ok()
            .and_then(|n| n.get(uuid).cloned())
    }

    pub fn all(&self) -> Vec<Notification> {
        self.notifications
            .read()
            .map(|n| n.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of `add` calls, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn add(&self, notification: &Notification) -> Result<AddOutcome, NotificationStoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationStoreError::Unavailable(
                "memory store is failing".to_string(),
            ));
        }

        let mut notifications = self
            .notifications
            .write()
            .map_err(|e| NotificationStoreError::Unavailable(e.to_string()))?;

        if notifications.contains_key(&notification.uuid) {
            return Ok(AddOutcome::Duplicate);
        }
        notifications.insert(notification.uuid, notification.clone());
        Ok(AddOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_events_shared::{Guid, NotificationType};
    use chrono::Utc;
    use serde_json::Map;

    fn notification() -> Notification {
        Notification::new(
            Guid::parse("1").unwrap(),
            Guid::parse("2").unwrap(),
            NotificationType::VoteUp,
            Map::new(),
            Some("urn:activity:3".to_string()),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_add_twice_is_duplicate() {
        let store = MemoryNotificationStore::new();
        let n = notification();

        assert_eq!(store.add(&n).await.unwrap(), AddOutcome::Inserted);
        assert_eq!(store.add(&n).await.unwrap(), AddOutcome::Duplicate);
        assert_eq!(store.len(), 1);
        assert_eq!(store.attempts(), 2);
    }

    #[tokio::test]
    async fn test_failing_store_writes_nothing() {
        let store = MemoryNotificationStore::new();
        store.set_failing(true);

        assert!(store.add(&notification()).await.is_err());
        assert!(store.is_empty());

        store.set_failing(false);
        assert_eq!(store.add(&notification()).await.unwrap(), AddOutcome::Inserted);
    }
}
