//! Integration tests for the PostgreSQL repository implementations.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `DATABASE_URL=... cargo test --test postgres_integration -- --ignored`

use action_events_repository::{
    AddOutcome, DirectoryLookup, NotificationStore, PostgresDirectory, PostgresNotificationStore,
};
use action_events_shared::{Guid, Notification, NotificationType};
use chrono::Utc;
use serde_json::{json, Map, Value};

fn guid(s: &str) -> Guid {
    Guid::parse(s).unwrap()
}

/// Creates a comment notification with default values.
fn make_notification() -> Notification {
    let mut data = Map::new();
    data.insert("comment_urn".to_string(), json!("urn:comment:500:9"));
    Notification::new(
        guid("0098765432109876543"),
        guid("100000000000000000001"),
        NotificationType::Comment,
        data,
        Some("urn:activity:500".to_string()),
        Utc::now(),
    )
}

// ============================================================================
// Notification Store Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_add_notification(pool: sqlx::PgPool) {
    let store = PostgresNotificationStore::new(pool.clone()).await.unwrap();
    let notification = make_notification();

    assert_eq!(store.add(&notification).await.unwrap(), AddOutcome::Inserted);

    let (to_guid, notification_type, data): (String, String, Value) =
        sqlx::query_as("SELECT to_guid, type, data FROM notifications WHERE uuid = $1")
            .bind(notification.uuid)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert_eq!(to_guid, "0098765432109876543");
    assert_eq!(notification_type, "comment");
    assert_eq!(data, json!({ "comment_urn": "urn:comment:500:9" }));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_add_duplicate_notification(pool: sqlx::PgPool) {
    let store = PostgresNotificationStore::new(pool.clone()).await.unwrap();
    let notification = make_notification();

    assert_eq!(store.add(&notification).await.unwrap(), AddOutcome::Inserted);
    assert_eq!(store.add(&notification).await.unwrap(), AddOutcome::Duplicate);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ============================================================================
// Directory Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_resolve_entity(pool: sqlx::PgPool) {
    sqlx::query("INSERT INTO entities (guid, owner_guid, urn, type) VALUES ($1, $2, $3, $4)")
        .bind("500")
        .bind("0098765432109876543")
        .bind("urn:activity:500")
        .bind("activity")
        .execute(&pool)
        .await
        .unwrap();
    let directory = PostgresDirectory::new(pool).await.unwrap();

    let entity = directory.resolve(&guid("500")).await.unwrap().unwrap();
    assert_eq!(entity.owner_guid, Some(guid("0098765432109876543")));
    assert_eq!(entity.urn, "urn:activity:500");
    assert!(!entity.is_user());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_resolve_unknown_guid(pool: sqlx::PgPool) {
    let directory = PostgresDirectory::new(pool).await.unwrap();
    assert!(directory.resolve(&guid("404")).await.unwrap().is_none());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_resolve_entity_with_empty_owner(pool: sqlx::PgPool) {
    sqlx::query("INSERT INTO entities (guid, owner_guid, urn, type, subtype) VALUES ($1, '', $2, $3, $4)")
        .bind("600")
        .bind("urn:object:600")
        .bind("object")
        .bind("image")
        .execute(&pool)
        .await
        .unwrap();
    let directory = PostgresDirectory::new(pool).await.unwrap();

    let entity = directory.resolve(&guid("600")).await.unwrap().unwrap();
    assert_eq!(entity.owner_guid, None);
    assert_eq!(entity.subtype, "image");
}
