//! Device directives.
//!
//! Directives are value objects attached to a response: created through the
//! factory constructors, appended to the directive list, serialized, never
//! mutated afterward. Play-type directives carry a generated correlation
//! token; the device echoes it back in subsequent playback-event requests so
//! a skill can tell which play directive an event belongs to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dialog::Intent;

/// How a play directive interacts with the device's playback queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayBehavior {
    /// Drop the current queue and play this stream now.
    #[default]
    ReplaceAll,
    /// Append this stream to the end of the queue.
    Enqueue,
    /// Keep the current stream, replace everything queued behind it.
    ReplaceEnqueued,
}

/// Which queued streams a clear-queue directive removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearBehavior {
    /// Clear the queue and stop the current stream.
    #[default]
    ClearAll,
    /// Clear the queue but let the current stream finish.
    ClearEnqueued,
}

/// A device-control instruction attached to a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "AudioPlayer.Play", rename_all = "camelCase")]
    AudioPlayerPlay {
        token: String,
        url: String,
        offset_in_milliseconds: u64,
        play_behavior: PlayBehavior,
    },
    #[serde(rename = "AudioPlayer.Stop")]
    AudioPlayerStop,
    #[serde(rename = "AudioPlayer.ClearQueue", rename_all = "camelCase")]
    AudioPlayerClearQueue { clear_behavior: ClearBehavior },
    #[serde(rename = "VideoPlayer.Play", rename_all = "camelCase")]
    VideoPlayerPlay {
        token: String,
        url: String,
        offset_in_milliseconds: u64,
    },
    #[serde(rename = "VideoPlayer.Stop")]
    VideoPlayerStop,
    #[serde(rename = "Dialog.ElicitSlot", rename_all = "camelCase")]
    DialogElicitSlot {
        slot_to_elicit: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        updated_intent: Option<Intent>,
    },
}

impl Directive {
    /// Starts audio playback from the beginning of `url`, replacing the
    /// current queue. A fresh correlation token is generated.
    pub fn audio_play(url: impl Into<String>) -> Self {
        Self::audio_play_from(url, 0, PlayBehavior::ReplaceAll)
    }

    /// Starts audio playback with an explicit offset and queue behavior.
    pub fn audio_play_from(
        url: impl Into<String>,
        offset_in_milliseconds: u64,
        play_behavior: PlayBehavior,
    ) -> Self {
        Self::AudioPlayerPlay {
            token: gen_token(),
            url: url.into(),
            offset_in_milliseconds,
            play_behavior,
        }
    }

    /// Stops audio playback.
    pub fn audio_stop() -> Self {
        Self::AudioPlayerStop
    }

    /// Clears the audio playback queue.
    pub fn audio_clear_queue(clear_behavior: ClearBehavior) -> Self {
        Self::AudioPlayerClearQueue { clear_behavior }
    }

    /// Starts video playback of `url` with a fresh correlation token.
    pub fn video_play(url: impl Into<String>) -> Self {
        Self::VideoPlayerPlay {
            token: gen_token(),
            url: url.into(),
            offset_in_milliseconds: 0,
        }
    }

    /// Stops video playback.
    pub fn video_stop() -> Self {
        Self::VideoPlayerStop
    }

    /// Asks the user to supply the named slot, carrying the updated intent
    /// so the answer is routed back into it on the next turn.
    pub fn elicit_slot(slot: impl Into<String>, updated_intent: Option<Intent>) -> Self {
        Self::DialogElicitSlot {
            slot_to_elicit: slot.into(),
            updated_intent,
        }
    }

    /// The wire discriminator of this directive.
    pub fn directive_type(&self) -> &'static str {
        match self {
            Self::AudioPlayerPlay { .. } => "AudioPlayer.Play",
            Self::AudioPlayerStop => "AudioPlayer.Stop",
            Self::AudioPlayerClearQueue { .. } => "AudioPlayer.ClearQueue",
            Self::VideoPlayerPlay { .. } => "VideoPlayer.Play",
            Self::VideoPlayerStop => "VideoPlayer.Stop",
            Self::DialogElicitSlot { .. } => "Dialog.ElicitSlot",
        }
    }

    /// The correlation token, for play-type directives.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::AudioPlayerPlay { token, .. } | Self::VideoPlayerPlay { token, .. } => {
                Some(token)
            }
            _ => None,
        }
    }
}

fn gen_token() -> String {
    Uuid::new_v4().to_string()
}
