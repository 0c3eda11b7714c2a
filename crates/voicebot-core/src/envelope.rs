//! Request envelope parsing.
//!
//! The envelope is the top-level JSON object the platform posts for every
//! turn: `{version, session, context, request}`. Parsing stops short of
//! deciding which concrete request variant the `request` section holds; that
//! is the classifier's job (see [`crate::request`]), so `request` is kept as
//! a raw [`serde_json::Value`] here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BotError, Result};
use crate::request::player::PlayerContext;

/// The parsed top-level request envelope. Immutable once parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    /// Protocol version reported by the platform.
    #[serde(default)]
    pub version: String,
    /// Session state replayed by the platform for this turn.
    #[serde(default)]
    pub session: Session,
    /// Device-side context (current player state etc.).
    #[serde(default)]
    pub context: Context,
    /// The polymorphic request section, left raw for the classifier.
    #[serde(default)]
    pub request: Value,
}

impl RequestEnvelope {
    /// Parses a raw JSON payload into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MalformedPayload`] when the payload is not valid
    /// JSON, and [`BotError::MissingField`] when `version` or `request.type`
    /// is absent or empty.
    pub fn from_json(raw: &str) -> Result<Self> {
        let envelope: Self =
            serde_json::from_str(raw).map_err(|err| BotError::malformed(err.to_string()))?;

        if envelope.version.is_empty() {
            return Err(BotError::MissingField("version"));
        }
        if envelope.request_type().is_empty() {
            return Err(BotError::MissingField("request.type"));
        }

        Ok(envelope)
    }

    /// The raw discriminator string of the request section.
    pub fn request_type(&self) -> &str {
        self.request
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// Per-turn session state.
///
/// Attributes are opaque key-value state the platform persists across turns:
/// they are replayed in the incoming envelope and echoed back (possibly
/// mutated by handlers) in the outgoing one. The SDK itself never stores
/// them anywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier assigned by the platform.
    #[serde(default)]
    pub session_id: String,
    /// True on the first turn of a session.
    #[serde(default, rename = "new")]
    pub is_new: bool,
    /// Mutable string-to-JSON attribute map.
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl Session {
    /// Reads a session attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets a session attribute; it will be echoed back to the platform.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes a session attribute, returning the previous value if any.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }
}

/// Device-side context shipped alongside the request.
///
/// Only the player-state objects are modeled; anything else the platform
/// puts here is ignored for forward compatibility.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Context {
    /// Current audio player state, when the device has one.
    #[serde(default)]
    pub audio_player: Option<PlayerContext>,
    /// Current video player state, when the device has one.
    #[serde(default)]
    pub video_player: Option<PlayerContext>,
}
