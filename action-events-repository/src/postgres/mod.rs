//! PostgreSQL implementations of the repository interfaces.
//!
//! ## Database Tables
//!
//! - `notifications`: Derived notifications keyed by their natural-key uuid
//! - `entities`: Users and entities used to rehydrate action events
mod directory;
mod notification_store;

pub use directory::PostgresDirectory;
pub use notification_store::PostgresNotificationStore;

/// Applies the bundled migrations to `pool`.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("src/postgres/migrations").run(pool).await
}
