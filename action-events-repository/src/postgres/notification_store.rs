//! PostgreSQL implementation of the notification store.
//!
//! Inserts are idempotent: the uuid is the primary key and conflicting rows
//! are skipped with `ON CONFLICT DO NOTHING`.
use action_events_shared::Notification;
use async_trait::async_trait;
use sqlx::types::Json;

use crate::errors::NotificationStoreError;
use crate::interfaces::{AddOutcome, NotificationStore};

/// PostgreSQL-backed notification store.
pub struct PostgresNotificationStore {
    pool: sqlx::PgPool,
}

impl PostgresNotificationStore {
    /// Creates a new PostgreSQL notification store.
    ///
    /// # Arguments
    ///
    /// * `pool` - Connection pool with the `notifications` table migrated
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, NotificationStoreError> {
        Ok(Self { pool })
    }
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn add(&self, notification: &Notification) -> Result<AddOutcome, NotificationStoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (uuid, to_guid, from_guid, type, data, entity_urn, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (uuid) DO NOTHING
            "#,
        )
        .bind(notification.uuid)
        .bind(notification.to_guid.as_str())
        .bind(notification.from_guid.as_str())
        .bind(notification.notification_type.as_str())
        .bind(Json(&notification.data))
        .bind(notification.entity_urn.as_deref())
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(AddOutcome::Duplicate)
        } else {
            Ok(AddOutcome::Inserted)
        }
    }
}
