//! This module defines and re-exports the interfaces for the repository.
mod directory;
mod notification_store;

pub use directory::DirectoryLookup;
pub use notification_store::{AddOutcome, NotificationStore};
