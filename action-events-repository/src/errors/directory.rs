use thiserror::Error;

/// Represents errors that can occur while resolving identifiers.
///
/// An unknown identifier is not an error; lookups return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Invalid stored guid: {0}")]
    InvalidGuid(#[from] action_events_shared::GuidError),
}
