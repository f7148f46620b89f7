use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use action_events_shared::{EntityRef, Guid};
use async_trait::async_trait;

use crate::errors::DirectoryError;
use crate::interfaces::DirectoryLookup;

/// Directory backed by a map of pre-registered entities.
#[derive(Default)]
pub struct MemoryDirectory {
    entities: RwLock<HashMap<Guid, EntityRef>>,
    lookups: AtomicUsize,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with `entities`.
    pub fn with_entities(entities: impl IntoIterator<Item = EntityRef>) -> Self {
        let directory = Self::new();
        for entity in entities {
            directory.insert(entity);
        }
        directory
    }

    pub fn insert(&self, entity: EntityRef) {
        if let Ok(mut entities) = self.entities.write() {
            entities.insert(entity.guid.clone(), entity);
        }
    }

    pub fn remove(&self, guid: &Guid) {
        if let Ok(mut entities) = self.entities.write() {
            entities.remove(guid);
        }
    }

    /// Number of `resolve` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DirectoryLookup for MemoryDirectory {
    async fn resolve(&self, guid: &Guid) -> Result<Option<EntityRef>, DirectoryError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .entities
            .read()
            .ok()
            .and_then(|entities| entities.get(guid).cloned()))
    }
}
