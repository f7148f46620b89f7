//! In-memory repository implementations for tests and local development.
mod directory;
mod notification_store;

pub use directory::MemoryDirectory;
pub use notification_store::MemoryNotificationStore;
