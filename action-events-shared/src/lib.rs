//! # Action Events Shared
//! This crate defines the data structures shared by the action-event stream
//! and its consumers: identifiers, action kinds, action events, notifications
//! and the wire envelope / schema every action topic is bound to.
pub mod envelope;
pub mod errors;
pub mod schema;
pub mod types;

pub use envelope::{ActionEnvelope, ActionRecord};
pub use errors::{EnvelopeError, GuidError, SchemaError};
pub use schema::{FieldType, Schema, SchemaField};
pub use types::{
    ActionData, ActionEvent, ActionKind, EntityRef, Guid, Notification, NotificationType,
};
