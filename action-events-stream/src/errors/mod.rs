//! Error types for action event topics and their transports.
mod topic;
mod transport;

pub use topic::TopicError;
pub use transport::TransportError;
