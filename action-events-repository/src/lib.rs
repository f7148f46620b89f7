//! # Action Events Repository
//! This crate provides the traits and implementations for the collaborators
//! the action-event consumers depend on: resolving identifiers back to
//! entities and persisting derived notifications. It includes PostgreSQL
//! implementations, in-memory implementations and a caching directory.
pub mod cached;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use cached::CachedDirectory;
pub use errors::{DirectoryError, NotificationStoreError};
pub use interfaces::{AddOutcome, DirectoryLookup, NotificationStore};
pub use memory::{MemoryDirectory, MemoryNotificationStore};
pub use postgres::{PostgresDirectory, PostgresNotificationStore};
