//! Error types for the action events repository.
//! Consolidates and re-exports error types for the directory and the
//! notification store.
mod directory;
mod notification_store;

pub use directory::DirectoryError;
pub use notification_store::NotificationStoreError;
