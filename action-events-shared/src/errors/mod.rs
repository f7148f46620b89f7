//! Error types for the shared action-event model.
use thiserror::Error;

/// Errors raised when an identifier is not a decimal guid string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuidError {
    #[error("Guid is empty")]
    Empty,
    #[error("Guid is not a decimal string: {0}")]
    NotDecimal(String),
}

/// Errors raised when a payload does not satisfy a topic schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Payload is not a record")]
    NotARecord,
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),
    #[error("Field {field} must be of type {expected}")]
    WrongType { field: String, expected: String },
}

/// Errors raised while encoding or decoding the wire envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Schema violation: {0}")]
    Schema(#[from] SchemaError),
    #[error("Invalid guid in field {field}: {source}")]
    InvalidGuid {
        field: &'static str,
        #[source]
        source: GuidError,
    },
    #[error("action_data is not a JSON object")]
    ActionDataNotObject,
    #[error("Unknown action kind: {0}")]
    UnknownAction(String),
}

impl EnvelopeError {
    /// Whether the envelope is well formed but names an action this build
    /// does not know about.
    pub fn is_unknown_action(&self) -> bool {
        matches!(self, Self::UnknownAction(_))
    }
}
