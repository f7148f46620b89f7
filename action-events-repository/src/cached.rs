//! Caching decorator for directory lookups.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use action_events_shared::{EntityRef, Guid};
use async_trait::async_trait;
use tracing::debug;

use crate::errors::DirectoryError;
use crate::interfaces::DirectoryLookup;

/// Default number of entries kept before the cache is cleared.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Memoises successful lookups of an inner directory.
///
/// Misses are never cached, so an identifier that becomes resolvable later
/// is found on the next attempt. The cache is cleared when it reaches its
/// capacity.
pub struct CachedDirectory {
    inner: Arc<dyn DirectoryLookup>,
    capacity: usize,
    entries: RwLock<HashMap<Guid, EntityRef>>,
}

impl CachedDirectory {
    pub fn new(inner: Arc<dyn DirectoryLookup>) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: Arc<dyn DirectoryLookup>, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, guid: &Guid) -> Option<EntityRef> {
        self.entries.read().ok()?.get(guid).cloned()
    }

    fn remember(&self, entity: &EntityRef) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        if entries.len() >= self.capacity {
            debug!(capacity = self.capacity, "Directory cache full, clearing");
            entries.clear();
        }
        entries.insert(entity.guid.clone(), entity.clone());
    }
}

#[async_trait]
impl DirectoryLookup for CachedDirectory {
    async fn resolve(&self, guid: &Guid) -> Result<Option<EntityRef>, DirectoryError> {
        if let Some(entity) = self.cached(guid) {
            return Ok(Some(entity));
        }

        let resolved = self.inner.resolve(guid).await?;
        if let Some(entity) = &resolved {
            self.remember(entity);
        }
        Ok(resolved)
    }
}
