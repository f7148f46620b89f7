//! Stream configuration read once at startup.

use std::env;
use std::time::Duration;

/// Default topic root.
const DEFAULT_ROOT: &str = "persistent";

/// Default tenant.
const DEFAULT_TENANT: &str = "public";

/// Default namespace.
const DEFAULT_NAMESPACE: &str = "default";

/// Default delay after a negative acknowledgment, in milliseconds.
const DEFAULT_NACK_BACKOFF_MS: u64 = 1000;

/// Default number of redeliveries tolerated for messages that cannot be
/// turned into events.
const DEFAULT_MAX_REDELIVERIES: u32 = 5;

/// Where topics live: root, tenant and namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    pub root: String,
    pub tenant: String,
    pub namespace: String,
}

impl StreamConfig {
    pub fn new(
        root: impl Into<String>,
        tenant: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            tenant: tenant.into(),
            namespace: namespace.into(),
        }
    }

    /// Reads the stream configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `EVENT_STREAMS_ROOT`: Topic root (default: persistent)
    /// - `EVENT_STREAMS_TENANT`: Tenant (default: public)
    /// - `EVENT_STREAMS_NAMESPACE`: Namespace (default: default)
    pub fn from_env() -> Self {
        Self {
            root: env::var("EVENT_STREAMS_ROOT").unwrap_or_else(|_| DEFAULT_ROOT.to_string()),
            tenant: env::var("EVENT_STREAMS_TENANT")
                .unwrap_or_else(|_| DEFAULT_TENANT.to_string()),
            namespace: env::var("EVENT_STREAMS_NAMESPACE")
                .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string()),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT, DEFAULT_TENANT, DEFAULT_NAMESPACE)
    }
}

/// Redelivery behaviour of the consume loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeConfig {
    /// Pause after every negative acknowledgment before the next receive.
    pub nack_backoff: Duration,
    /// Redeliveries after which a malformed message, or one whose user or
    /// entity cannot be resolved, is acknowledged and dropped.
    pub max_redeliveries: u32,
}

impl ConsumeConfig {
    /// Reads the consume configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `NACK_BACKOFF_MS`: Pause after a negative acknowledgment (default: 1000)
    /// - `MAX_REDELIVERIES`: Redeliveries before dropping (default: 5)
    pub fn from_env() -> Self {
        let nack_backoff_ms = env::var("NACK_BACKOFF_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_NACK_BACKOFF_MS);
        let max_redeliveries = env::var("MAX_REDELIVERIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_REDELIVERIES);

        Self {
            nack_backoff: Duration::from_millis(nack_backoff_ms),
            max_redeliveries,
        }
    }
}

impl Default for ConsumeConfig {
    fn default() -> Self {
        Self {
            nack_backoff: Duration::from_millis(DEFAULT_NACK_BACKOFF_MS),
            max_redeliveries: DEFAULT_MAX_REDELIVERIES,
        }
    }
}
