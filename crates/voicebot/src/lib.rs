//! Server-side SDK for building voice-assistant skills.
//!
//! The platform posts one JSON envelope per turn; the SDK classifies it,
//! fans it out to the handlers registered for its request kind, and
//! serializes whatever the handlers put into the shared response builder.
//! Transport (HTTP, TLS, request signing) stays outside: hand [`Bot`] a raw
//! payload, get a raw JSON string back.
//!
//! ```no_run
//! use voicebot::Bot;
//!
//! fn answer(raw: &str) -> voicebot::Result<String> {
//!     let mut bot = Bot::from_json(raw)?;
//!     bot.on_launch(|ctx, _request| {
//!         ctx.response.ask("Where do you want to go?");
//!         Ok(())
//!     });
//!     bot.on_intent(|ctx, request| {
//!         match request.slot_value("city") {
//!             Some(city) => {
//!                 ctx.session.set_attribute("city", city);
//!                 ctx.response.tell(format!("Off to {city}!"));
//!             }
//!             None => {
//!                 ctx.response.ask_slot("Which city?", "city");
//!             }
//!         }
//!         Ok(())
//!     });
//!     bot.handle()
//! }
//! ```

pub mod bot;
pub mod registry;

pub use bot::{Bot, DispatchPolicy, TurnContext};
pub use registry::EventRegistry;

// Re-export the core model types skills work with.
pub use voicebot_core::dialog::{ConfirmationStatus, Dialog, Intent, Slot, SlotState};
pub use voicebot_core::directive::{ClearBehavior, Directive, PlayBehavior};
pub use voicebot_core::envelope::{RequestEnvelope, Session};
pub use voicebot_core::request::player::{PlayActivity, PlayerContext};
pub use voicebot_core::request::{
    AudioPlayerEventRequest, IntentRequest, LaunchRequest, Request, RequestKind,
    SessionEndedRequest, UnhandledRequest, VideoPlayerEventRequest,
};
pub use voicebot_core::response::{Response, ResponseEnvelope, Speech};
pub use voicebot_core::{BotError, Result, PROTOCOL_VERSION};
