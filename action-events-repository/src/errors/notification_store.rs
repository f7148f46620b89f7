use thiserror::Error;

/// Represents errors that can occur while persisting notifications.
#[derive(Debug, Error)]
pub enum NotificationStoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
