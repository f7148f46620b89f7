//! Dependency initialization and wiring for the notifications service.

use std::env;
use std::sync::Arc;

use action_events_repository::cached::DEFAULT_CACHE_CAPACITY;
use action_events_repository::postgres::run_migrations;
use action_events_repository::{CachedDirectory, PostgresDirectory, PostgresNotificationStore};
use action_events_stream::{
    ActionEventsTopic, ConsumeConfig, KafkaConfig, KafkaTransport, StreamConfig,
};
use tracing::info;

use crate::classifier::{ClassifierConfig, NotificationClassifier};
use crate::errors::NotificationsError;
use crate::subscription::NotificationsSubscription;

/// Container for all initialized dependencies.
pub struct Dependencies {
    pub topic: ActionEventsTopic,
    pub subscription: NotificationsSubscription,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `DIRECTORY_CACHE_CAPACITY`: Cached directory entries (default: 10000)
    /// - `EVENT_STREAMS_*`, `KAFKA_*`, `NACK_BACKOFF_MS`, `MAX_REDELIVERIES`:
    ///   see [`StreamConfig`], [`KafkaConfig`] and [`ConsumeConfig`]
    /// - `PLUS_HANDLER_GUID`, `PRO_HANDLER_GUID`: see [`ClassifierConfig`]
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(NotificationsError)` - If configuration is invalid or the
    ///   database cannot be reached
    pub async fn new() -> Result<Self, NotificationsError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| NotificationsError::config("DATABASE_URL must be set"))?;
        let cache_capacity = env::var("DIRECTORY_CACHE_CAPACITY")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CACHE_CAPACITY);

        let stream_config = StreamConfig::from_env();
        let consume_config = ConsumeConfig::from_env();
        let kafka_config = KafkaConfig::from_env();
        let classifier_config = ClassifierConfig::from_env()?;

        info!(
            kafka_broker = %kafka_config.broker,
            tenant = %stream_config.tenant,
            namespace = %stream_config.namespace,
            nack_backoff_ms = consume_config.nack_backoff.as_millis() as u64,
            max_redeliveries = consume_config.max_redeliveries,
            directory_cache_capacity = cache_capacity,
            "Initializing dependencies"
        );

        let pool = sqlx::PgPool::connect(&database_url).await?;
        run_migrations(&pool).await?;

        info!("Database connection established");

        let directory = CachedDirectory::with_capacity(
            Arc::new(PostgresDirectory::new(pool.clone()).await?),
            cache_capacity,
        );
        let store = PostgresNotificationStore::new(pool).await?;

        let topic = ActionEventsTopic::new(
            Arc::new(KafkaTransport::new(kafka_config)),
            Arc::new(directory),
            stream_config,
        )
        .with_consume_config(consume_config);

        let subscription = NotificationsSubscription::new(
            NotificationClassifier::new(classifier_config),
            Arc::new(store),
        );

        Ok(Self {
            topic,
            subscription,
        })
    }
}
