//! Error types for the voicebot SDK.

use thiserror::Error;

/// A shared error type for the whole SDK.
///
/// Parse-time errors (`MalformedPayload`, `MissingField`) abort processing
/// before any handler runs; `Handler` carries a failure reported by a
/// registered callback during dispatch.
#[derive(Error, Debug, Clone)]
pub enum BotError {
    /// The raw request payload could not be parsed as JSON.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A required envelope field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Serializing the outgoing response envelope failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A registered handler reported a failure.
    #[error("handler error: {0}")]
    Handler(String),
}

impl BotError {
    /// Creates a MalformedPayload error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    /// Creates a Handler error.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    /// Check if this is a parse-time error (payload rejected before dispatch).
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::MalformedPayload(_) | Self::MissingField(_))
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A type alias for `Result<T, BotError>`.
pub type Result<T> = std::result::Result<T, BotError>;
