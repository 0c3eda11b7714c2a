//! The bot: one incoming request, its registry, and its response.
//!
//! A [`Bot`] is constructed fresh for every raw payload. Setup registers
//! handlers, [`Bot::run`] fans the classified request out to every handler
//! registered for its kind (in registration order), and [`Bot::build`]
//! serializes whatever the handlers left in the response builder.

use voicebot_core::dialog::Dialog;
use voicebot_core::envelope::{RequestEnvelope, Session};
use voicebot_core::request::{
    AudioPlayerEventRequest, IntentRequest, LaunchRequest, Request, SessionEndedRequest,
    VideoPlayerEventRequest,
};
use voicebot_core::response::Response;
use voicebot_core::Result;

use crate::registry::EventRegistry;

/// What dispatch does when a handler returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// Log the failure and keep invoking the remaining handlers.
    #[default]
    Isolate,
    /// Stop the fan-out and surface the error from [`Bot::run`].
    FailFast,
}

/// The mutable state handlers work against: the turn's session and the
/// shared response builder. Handlers receive it for the duration of one
/// dispatch call and must not retain it.
pub struct TurnContext {
    /// Session state replayed by the platform; mutations are echoed back.
    pub session: Session,
    /// The one response builder for this request.
    pub response: Response,
}

/// One request/response cycle of a skill.
pub struct Bot {
    registry: EventRegistry,
    request: Request,
    turn: TurnContext,
    policy: DispatchPolicy,
}

impl Bot {
    /// Parses and classifies a raw JSON payload into a bot ready for
    /// handler registration.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the payload is malformed or missing
    /// required fields; unknown request kinds are not an error.
    pub fn from_json(raw: &str) -> Result<Self> {
        let envelope = RequestEnvelope::from_json(raw)?;
        let request = Request::classify(&envelope)?;

        let dialog = match &request {
            Request::Intent(intent) => Dialog::new(intent.intents.clone()),
            _ => Dialog::default(),
        };

        Ok(Self {
            registry: EventRegistry::new(),
            turn: TurnContext {
                session: envelope.session,
                response: Response::with_dialog(dialog),
            },
            request,
            policy: DispatchPolicy::default(),
        })
    }

    /// Sets the handler-failure policy for this bot.
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The classified request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The turn's session state.
    pub fn session(&self) -> &Session {
        &self.turn.session
    }

    /// Mutable session state, for callers outside dispatch.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.turn.session
    }

    /// The turn's response builder.
    pub fn response(&self) -> &Response {
        &self.turn.response
    }

    /// Mutable response builder, for callers outside dispatch.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.turn.response
    }

    /// Registers a handler for launch requests.
    pub fn on_launch<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &LaunchRequest) -> Result<()> + 'static,
    {
        self.registry.add_launch(Box::new(handler));
        self
    }

    /// Registers a handler for intent requests.
    pub fn on_intent<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &IntentRequest) -> Result<()> + 'static,
    {
        self.registry.add_intent(Box::new(handler));
        self
    }

    /// Registers a handler for session-ended requests.
    pub fn on_session_ended<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &SessionEndedRequest) -> Result<()> + 'static,
    {
        self.registry.add_session_ended(Box::new(handler));
        self
    }

    /// Registers a handler for a specific `AudioPlayer.*` event, keyed by
    /// the full discriminator string.
    pub fn on_audio_player_event<F>(&mut self, event_type: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &AudioPlayerEventRequest) -> Result<()> + 'static,
    {
        self.registry.add_audio_player(event_type, Box::new(handler));
        self
    }

    /// Registers a handler for `AudioPlayer.PlaybackStarted`.
    pub fn on_audio_playback_started<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &AudioPlayerEventRequest) -> Result<()> + 'static,
    {
        self.on_audio_player_event("AudioPlayer.PlaybackStarted", handler)
    }

    /// Registers a handler for `AudioPlayer.PlaybackStopped`.
    pub fn on_audio_playback_stopped<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &AudioPlayerEventRequest) -> Result<()> + 'static,
    {
        self.on_audio_player_event("AudioPlayer.PlaybackStopped", handler)
    }

    /// Registers a handler for `AudioPlayer.PlaybackPaused`.
    pub fn on_audio_playback_paused<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &AudioPlayerEventRequest) -> Result<()> + 'static,
    {
        self.on_audio_player_event("AudioPlayer.PlaybackPaused", handler)
    }

    /// Registers a handler for `AudioPlayer.PlaybackFinished`.
    pub fn on_audio_playback_finished<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &AudioPlayerEventRequest) -> Result<()> + 'static,
    {
        self.on_audio_player_event("AudioPlayer.PlaybackFinished", handler)
    }

    /// Registers a handler for a specific `VideoPlayer.*` event, keyed by
    /// the full discriminator string.
    pub fn on_video_player_event<F>(&mut self, event_type: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &VideoPlayerEventRequest) -> Result<()> + 'static,
    {
        self.registry.add_video_player(event_type, Box::new(handler));
        self
    }

    /// Registers a handler for `VideoPlayer.PlaybackStarted`.
    pub fn on_video_playback_started<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &VideoPlayerEventRequest) -> Result<()> + 'static,
    {
        self.on_video_player_event("VideoPlayer.PlaybackStarted", handler)
    }

    /// Registers a handler for `VideoPlayer.PlaybackStopped`.
    pub fn on_video_playback_stopped<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &VideoPlayerEventRequest) -> Result<()> + 'static,
    {
        self.on_video_player_event("VideoPlayer.PlaybackStopped", handler)
    }

    /// Registers a handler for `VideoPlayer.PlaybackFinished`.
    pub fn on_video_playback_finished<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut TurnContext, &VideoPlayerEventRequest) -> Result<()> + 'static,
    {
        self.on_video_player_event("VideoPlayer.PlaybackFinished", handler)
    }

    /// Invokes every handler registered for the classified request's kind,
    /// sequentially and in registration order.
    ///
    /// A kind with zero registered handlers is a silent no-op; a skill that
    /// only cares about a subset of request kinds is normal, not an error.
    ///
    /// # Errors
    ///
    /// Under [`DispatchPolicy::FailFast`], returns the first handler error.
    /// Under the default [`DispatchPolicy::Isolate`], handler errors are
    /// logged and `run` itself always succeeds.
    pub fn run(&mut self) -> Result<()> {
        match &self.request {
            Request::Launch(request) => {
                dispatch(&self.registry.launch, &mut self.turn, request, self.policy)
            }
            Request::Intent(request) => {
                dispatch(&self.registry.intent, &mut self.turn, request, self.policy)
            }
            Request::SessionEnded(request) => dispatch(
                &self.registry.session_ended,
                &mut self.turn,
                request,
                self.policy,
            ),
            Request::AudioPlayerEvent(request) => {
                match self.registry.audio_player.get(request.request_type.as_str()) {
                    Some(handlers) => dispatch(handlers, &mut self.turn, request, self.policy),
                    None => {
                        tracing::debug!(
                            request_type = %request.request_type,
                            "no handler registered for audio player event"
                        );
                        Ok(())
                    }
                }
            }
            Request::VideoPlayerEvent(request) => {
                match self.registry.video_player.get(request.request_type.as_str()) {
                    Some(handlers) => dispatch(handlers, &mut self.turn, request, self.policy),
                    None => {
                        tracing::debug!(
                            request_type = %request.request_type,
                            "no handler registered for video player event"
                        );
                        Ok(())
                    }
                }
            }
            Request::Unhandled(request) => {
                tracing::debug!(
                    request_type = %request.request_type,
                    "skipping dispatch for unrecognized request type"
                );
                Ok(())
            }
        }
    }

    /// Serializes the response envelope from the current builder state.
    ///
    /// Building re-reads state rather than consuming it, so it may be called
    /// again after further mutation.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON encoding fails.
    pub fn build(&self) -> Result<String> {
        self.turn.response.build(&self.turn.session)
    }

    /// Convenience for transports: dispatch, then build.
    pub fn handle(&mut self) -> Result<String> {
        self.run()?;
        self.build()
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("request_type", &self.request.request_type())
            .field("handlers", &self.registry.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn dispatch<R>(
    handlers: &[Box<dyn Fn(&mut TurnContext, &R) -> Result<()>>],
    turn: &mut TurnContext,
    request: &R,
    policy: DispatchPolicy,
) -> Result<()> {
    if handlers.is_empty() {
        tracing::debug!("no handler registered for request kind");
        return Ok(());
    }

    for handler in handlers {
        if let Err(err) = handler(turn, request) {
            match policy {
                DispatchPolicy::FailFast => return Err(err),
                DispatchPolicy::Isolate => {
                    tracing::warn!(error = %err, "handler failed, continuing fan-out");
                }
            }
        }
    }

    Ok(())
}
