//! Error types for the notifications service.
use action_events_repository::{DirectoryError, NotificationStoreError};
use action_events_shared::{ActionKind, GuidError};
use action_events_stream::TopicError;
use thiserror::Error;

/// Errors raised while deriving a notification from one action event.
///
/// These describe events that can never produce a notification, so the
/// event is acknowledged after logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("{action} event is missing action_data field {field}")]
    MissingField {
        action: ActionKind,
        field: &'static str,
    },

    #[error("{action} event has invalid action_data field {field}: expected {expected}")]
    InvalidField {
        action: ActionKind,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{action} event carries an invalid guid in {field}: {source}")]
    InvalidGuid {
        action: ActionKind,
        field: &'static str,
        #[source]
        source: GuidError,
    },

    #[error("{action} event on an entity without owner has no recipient")]
    NoRecipient { action: ActionKind },
}

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum NotificationsError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Notification store error: {0}")]
    NotificationStore(#[from] NotificationStoreError),

    #[error("Topic error: {0}")]
    Topic(#[from] TopicError),
}

impl NotificationsError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
