use action_events_shared::{EntityRef, Guid};

use crate::errors::DirectoryError;

/// Resolves opaque identifiers back to users and entities.
///
/// Lookups are best-effort reads and may be served from a cache. Unknown or
/// removed identifiers resolve to `Ok(None)`.
#[async_trait::async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Resolves a guid to the user or entity it identifies.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(EntityRef))` - The identifier is known
    /// * `Ok(None)` - The identifier is unknown or was removed
    /// * `Err(DirectoryError)` - The backend failed
    async fn resolve(&self, guid: &Guid) -> Result<Option<EntityRef>, DirectoryError>;
}
