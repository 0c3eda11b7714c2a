//! Request classification.
//!
//! The envelope leaves its `request` section as raw JSON; classification
//! turns it into exactly one concrete [`Request`] variant based on the
//! `type` discriminator. Unknown fields inside a recognized request are
//! ignored and unknown discriminators classify as [`Request::Unhandled`]
//! rather than failing, so a skill keeps working when the platform ships
//! request kinds this SDK does not model yet.

pub mod player;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::dialog::Intent;
use crate::envelope::RequestEnvelope;
use crate::error::{BotError, Result};
use player::PlayerContext;

/// Broad grouping of request discriminators, used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Launch,
    Intent,
    SessionEnded,
    AudioPlayerEvent,
    VideoPlayerEvent,
    Unhandled,
}

/// One classified platform request.
#[derive(Debug, Clone)]
pub enum Request {
    Launch(LaunchRequest),
    Intent(IntentRequest),
    SessionEnded(SessionEndedRequest),
    AudioPlayerEvent(AudioPlayerEventRequest),
    VideoPlayerEvent(VideoPlayerEventRequest),
    Unhandled(UnhandledRequest),
}

impl Request {
    /// Classifies the envelope's request section into a concrete variant.
    ///
    /// Player events additionally absorb the matching player state from the
    /// envelope's `context` section, since handlers need to read it
    /// independently of the event's own offset.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MalformedPayload`] when the request body does not
    /// match the shape its discriminator promises.
    pub fn classify(envelope: &RequestEnvelope) -> Result<Self> {
        let request_type = envelope.request_type().to_string();
        let body = envelope.request.clone();

        let request = match request_type.as_str() {
            "LaunchRequest" => Self::Launch(decode(body)?),
            "IntentRequest" => Self::Intent(decode(body)?),
            "SessionEndedRequest" => Self::SessionEnded(decode(body)?),
            t if t.starts_with("AudioPlayer.") => {
                let mut request: AudioPlayerEventRequest = decode(body)?;
                if let Some(context) = &envelope.context.audio_player {
                    request.player_context = context.clone();
                }
                Self::AudioPlayerEvent(request)
            }
            t if t.starts_with("VideoPlayer.") => {
                let mut request: VideoPlayerEventRequest = decode(body)?;
                if let Some(context) = &envelope.context.video_player {
                    request.player_context = context.clone();
                }
                Self::VideoPlayerEvent(request)
            }
            other => {
                tracing::debug!(request_type = other, "unrecognized request type");
                Self::Unhandled(decode(body)?)
            }
        };

        tracing::debug!(request_type = %request.request_type(), "classified request");
        Ok(request)
    }

    /// The dispatch key for this request.
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Launch(_) => RequestKind::Launch,
            Self::Intent(_) => RequestKind::Intent,
            Self::SessionEnded(_) => RequestKind::SessionEnded,
            Self::AudioPlayerEvent(_) => RequestKind::AudioPlayerEvent,
            Self::VideoPlayerEvent(_) => RequestKind::VideoPlayerEvent,
            Self::Unhandled(_) => RequestKind::Unhandled,
        }
    }

    /// The raw discriminator string, exactly as received.
    pub fn request_type(&self) -> &str {
        match self {
            Self::Launch(r) => &r.request_type,
            Self::Intent(r) => &r.request_type,
            Self::SessionEnded(r) => &r.request_type,
            Self::AudioPlayerEvent(r) => &r.request_type,
            Self::VideoPlayerEvent(r) => &r.request_type,
            Self::Unhandled(r) => &r.request_type,
        }
    }

    /// The raw request timestamp, exactly as received.
    pub fn timestamp(&self) -> &str {
        match self {
            Self::Launch(r) => &r.timestamp,
            Self::Intent(r) => &r.timestamp,
            Self::SessionEnded(r) => &r.timestamp,
            Self::AudioPlayerEvent(r) => &r.timestamp,
            Self::VideoPlayerEvent(r) => &r.timestamp,
            Self::Unhandled(r) => &r.timestamp,
        }
    }

    /// The request timestamp parsed as RFC 3339, when it is one.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.timestamp())
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

fn decode<T: for<'de> Deserialize<'de>>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|err| BotError::malformed(err.to_string()))
}

/// A session-opening request with no type-specific fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub timestamp: String,
}

/// A request carrying one or more recognized intents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub timestamp: String,
    /// Recognized intents, best match first.
    #[serde(default)]
    pub intents: Vec<Intent>,
}

impl IntentRequest {
    /// The primary (best-match) intent.
    pub fn intent(&self) -> Option<&Intent> {
        self.intents.first()
    }

    /// Name of the primary intent.
    pub fn intent_name(&self) -> Option<&str> {
        self.intent().map(|intent| intent.name.as_str())
    }

    /// Filled value of a slot on the primary intent.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.intent().and_then(|intent| intent.slot_value(name))
    }
}

/// The platform ended the session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub timestamp: String,
    /// Why the session ended (user abort, error, timeout, ...).
    #[serde(default)]
    pub reason: String,
}

/// An `AudioPlayer.*` playback event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPlayerEventRequest {
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub timestamp: String,
    /// Correlation token of the play directive this event belongs to.
    #[serde(default)]
    pub token: String,
    /// Playback position the event was emitted at.
    #[serde(default)]
    pub offset_in_milliseconds: u64,
    /// Player state from the envelope context, attached by the classifier.
    #[serde(skip)]
    pub player_context: PlayerContext,
}

impl AudioPlayerEventRequest {
    /// The event name behind the `AudioPlayer.` prefix, e.g. `PlaybackStarted`.
    pub fn event_name(&self) -> &str {
        strip_player_prefix(&self.request_type)
    }

    /// The device's audio player state for this turn.
    pub fn audio_player_context(&self) -> &PlayerContext {
        &self.player_context
    }
}

/// A `VideoPlayer.*` playback event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPlayerEventRequest {
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub timestamp: String,
    /// Correlation token of the play directive this event belongs to.
    #[serde(default)]
    pub token: String,
    /// Playback position the event was emitted at.
    #[serde(default)]
    pub offset_in_milliseconds: u64,
    /// Player state from the envelope context, attached by the classifier.
    #[serde(skip)]
    pub player_context: PlayerContext,
}

impl VideoPlayerEventRequest {
    /// The event name behind the `VideoPlayer.` prefix.
    pub fn event_name(&self) -> &str {
        strip_player_prefix(&self.request_type)
    }

    /// The device's video player state for this turn.
    pub fn video_player_context(&self) -> &PlayerContext {
        &self.player_context
    }
}

/// A request whose discriminator this SDK does not model.
///
/// Dispatch for these is a no-op; the raw type string is kept so transports
/// can log what the platform sent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnhandledRequest {
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub timestamp: String,
}

fn strip_player_prefix(request_type: &str) -> &str {
    request_type
        .split_once('.')
        .map_or(request_type, |(_, event)| event)
}
