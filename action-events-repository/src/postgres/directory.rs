//! PostgreSQL implementation of the directory lookup.
use action_events_shared::{EntityRef, Guid};
use async_trait::async_trait;

use crate::errors::DirectoryError;
use crate::interfaces::DirectoryLookup;

/// Resolves guids from the `entities` read model.
pub struct PostgresDirectory {
    pool: sqlx::PgPool,
}

impl PostgresDirectory {
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, DirectoryError> {
        Ok(Self { pool })
    }
}

#[async_trait]
impl DirectoryLookup for PostgresDirectory {
    async fn resolve(&self, guid: &Guid) -> Result<Option<EntityRef>, DirectoryError> {
        let row: Option<(String, Option<String>, String, String, String)> = sqlx::query_as(
            "SELECT guid, owner_guid, urn, type, subtype FROM entities WHERE guid = $1",
        )
        .bind(guid.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some((guid, owner_guid, urn, entity_type, subtype)) = row else {
            return Ok(None);
        };

        let owner_guid = match owner_guid.filter(|owner| !owner.is_empty()) {
            Some(owner) => Some(Guid::parse(owner)?),
            None => None,
        };

        Ok(Some(EntityRef {
            guid: Guid::parse(guid)?,
            owner_guid,
            urn,
            entity_type,
            subtype,
        }))
    }
}
