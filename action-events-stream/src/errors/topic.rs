use action_events_shared::EnvelopeError;
use thiserror::Error;

use super::TransportError;

/// Errors raised by a topic binding.
#[derive(Error, Debug)]
pub enum TopicError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// The topic filter is not a valid regular expression.
    #[error("Invalid topic filter {filter}: {reason}")]
    InvalidFilter { filter: String, reason: String },
}
