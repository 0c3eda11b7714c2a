//! Per-bot event registry.
//!
//! Maps a request kind to the ordered list of handlers registered for it.
//! Multiple registrations for the same kind fan out in registration order;
//! nothing is deduplicated or overridden. The registry is owned by one
//! [`Bot`](crate::bot::Bot) and populated before dispatch, never shared as a
//! module-level singleton.

use std::collections::HashMap;

use voicebot_core::request::{
    AudioPlayerEventRequest, IntentRequest, LaunchRequest, SessionEndedRequest,
    VideoPlayerEventRequest,
};
use voicebot_core::Result;

use crate::bot::TurnContext;

/// Handler invoked for a launch request.
pub type LaunchHandler = Box<dyn Fn(&mut TurnContext, &LaunchRequest) -> Result<()>>;
/// Handler invoked for an intent request.
pub type IntentHandler = Box<dyn Fn(&mut TurnContext, &IntentRequest) -> Result<()>>;
/// Handler invoked when the platform ends the session.
pub type SessionEndedHandler = Box<dyn Fn(&mut TurnContext, &SessionEndedRequest) -> Result<()>>;
/// Handler invoked for a matching `AudioPlayer.*` event.
pub type AudioPlayerHandler = Box<dyn Fn(&mut TurnContext, &AudioPlayerEventRequest) -> Result<()>>;
/// Handler invoked for a matching `VideoPlayer.*` event.
pub type VideoPlayerHandler = Box<dyn Fn(&mut TurnContext, &VideoPlayerEventRequest) -> Result<()>>;

/// Ordered handler lists keyed by request kind. Player-event handlers are
/// keyed by the full discriminator string (e.g. `AudioPlayer.PlaybackStarted`).
#[derive(Default)]
pub struct EventRegistry {
    pub(crate) launch: Vec<LaunchHandler>,
    pub(crate) intent: Vec<IntentHandler>,
    pub(crate) session_ended: Vec<SessionEndedHandler>,
    pub(crate) audio_player: HashMap<String, Vec<AudioPlayerHandler>>,
    pub(crate) video_player: HashMap<String, Vec<VideoPlayerHandler>>,
}

impl EventRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_launch(&mut self, handler: LaunchHandler) {
        self.launch.push(handler);
    }

    pub(crate) fn add_intent(&mut self, handler: IntentHandler) {
        self.intent.push(handler);
    }

    pub(crate) fn add_session_ended(&mut self, handler: SessionEndedHandler) {
        self.session_ended.push(handler);
    }

    pub(crate) fn add_audio_player(&mut self, event_type: &str, handler: AudioPlayerHandler) {
        self.audio_player
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }

    pub(crate) fn add_video_player(&mut self, event_type: &str, handler: VideoPlayerHandler) {
        self.video_player
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }

    /// Total number of registered handlers.
    pub fn len(&self) -> usize {
        self.launch.len()
            + self.intent.len()
            + self.session_ended.len()
            + self.audio_player.values().map(Vec::len).sum::<usize>()
            + self.video_player.values().map(Vec::len).sum::<usize>()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
