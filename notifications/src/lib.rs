//! # Notifications
//!
//! Derives user notifications from the action event stream.
//!
//! ## Modules
//!
//! - [`classifier`]: The per-action rule table and its evaluation
//! - [`subscription`]: The `notifications` subscription persisting results
//! - [`config`]: Dependency initialization
//! - [`errors`]: Error types for the service

pub mod classifier;
pub mod config;
pub mod errors;
pub mod subscription;

pub use classifier::{Classification, ClassifierConfig, NotificationClassifier};
pub use config::Dependencies;
pub use errors::{ClassifyError, NotificationsError};
pub use subscription::{
    NotificationsSubscription, NOTIFICATIONS_SUBSCRIPTION_ID, NOTIFICATIONS_TOPIC_FILTER,
};
