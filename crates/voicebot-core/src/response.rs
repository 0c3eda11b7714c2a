//! Response builder and outgoing envelope serialization.
//!
//! One [`Response`] is created per incoming request and mutated by zero or
//! more handlers in registration order. [`Response::build`] is the terminal
//! operation: it folds in the session attributes and the pending dialog
//! directive and serializes the final envelope. Building re-reads current
//! state, so there is deliberately no one-shot guard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dialog::{Dialog, Intent};
use crate::directive::Directive;
use crate::envelope::Session;
use crate::error::Result;
use crate::PROTOCOL_VERSION;

/// Spoken output, either plain text or SSML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Speech {
    #[serde(rename = "PlainText")]
    Plain { text: String },
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

impl Speech {
    /// Wraps `speech`, detecting SSML by its `<speak>` root tag.
    pub fn format(speech: impl Into<String>) -> Self {
        let speech = speech.into();
        if speech.starts_with("<speak>") {
            Self::Ssml { ssml: speech }
        } else {
            Self::Plain { text: speech }
        }
    }
}

/// Accumulates the output of one turn.
#[derive(Debug, Clone)]
pub struct Response {
    speech: Option<Speech>,
    card: Option<Value>,
    directives: Vec<Directive>,
    should_end_session: bool,
    dialog: Dialog,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Creates an empty response. The session ends after this turn unless a
    /// handler calls [`hold_on`](Self::hold_on) or [`ask`](Self::ask).
    pub fn new() -> Self {
        Self::with_dialog(Dialog::default())
    }

    /// Creates a response carrying the dialog state of an intent request.
    pub fn with_dialog(dialog: Dialog) -> Self {
        Self {
            speech: None,
            card: None,
            directives: Vec::new(),
            should_end_session: true,
            dialog,
        }
    }

    /// Replies to the user with `speech` and closes the microphone.
    pub fn tell(&mut self, speech: impl Into<String>) -> &mut Self {
        self.speech = Some(Speech::format(speech));
        self
    }

    /// Asks the user a question: replies with `speech` and keeps the
    /// microphone open for the answer.
    pub fn ask(&mut self, speech: impl Into<String>) -> &mut Self {
        self.tell(speech);
        self.hold_on();
        self
    }

    /// Asks the user to supply the named slot. The built response carries a
    /// `Dialog.ElicitSlot` directive so the answer flows back into the
    /// current intent on the next turn.
    pub fn ask_slot(&mut self, speech: impl Into<String>, slot: impl Into<String>) -> &mut Self {
        self.ask(speech);
        self.dialog.elicit_slot(slot);
        self
    }

    /// Attaches a card for devices with a screen.
    pub fn display_card(&mut self, card: impl Into<Value>) -> &mut Self {
        self.card = Some(card.into());
        self
    }

    /// Appends a device directive. Directives are executed by the device in
    /// the order they were appended.
    pub fn command(&mut self, directive: Directive) -> &mut Self {
        self.directives.push(directive);
        self
    }

    /// Keeps the session open so the device listens for further input.
    pub fn hold_on(&mut self) -> &mut Self {
        self.should_end_session = false;
        self
    }

    /// Speech set so far.
    pub fn speech(&self) -> Option<&Speech> {
        self.speech.as_ref()
    }

    /// Directives appended via [`command`](Self::command) so far. The
    /// pending elicitation directive is only added at build time.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Whether the session ends after this turn.
    pub fn should_end_session(&self) -> bool {
        self.should_end_session
    }

    /// Dialog state for this turn.
    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Mutable dialog state, for handlers that drive elicitation directly.
    pub fn dialog_mut(&mut self) -> &mut Dialog {
        &mut self.dialog
    }

    /// Assembles the outgoing envelope from the current builder state and
    /// the session's attributes.
    pub fn to_envelope(&self, session: &Session) -> ResponseEnvelope {
        let mut directives = self.directives.clone();
        if let Some(directive) = self.dialog.directive() {
            directives.push(directive);
        }

        let context = self
            .dialog
            .current_intent()
            .cloned()
            .map(|intent| ContextResponse { intent });

        ResponseEnvelope {
            version: PROTOCOL_VERSION.to_string(),
            session: SessionResponse {
                attributes: session.attributes.clone(),
            },
            response: ResponseBody {
                output_speech: self.speech.clone(),
                card: self.card.clone(),
                directives,
                should_end_session: self.should_end_session,
            },
            context,
        }
    }

    /// Serializes the outgoing envelope to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BotError::Serialization`] if JSON encoding fails.
    pub fn build(&self, session: &Session) -> Result<String> {
        let envelope = self.to_envelope(session);
        Ok(serde_json::to_string(&envelope)?)
    }
}

/// The outgoing response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub session: SessionResponse,
    pub response: ResponseBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextResponse>,
}

/// Session attributes echoed back to the platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

/// The `response` section of the outgoing envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<Speech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    pub should_end_session: bool,
}

/// Dialog context echoed for intent requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextResponse {
    pub intent: Intent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tell_formats_plain_text() {
        let mut response = Response::new();
        response.tell("hello");
        assert_eq!(
            response.speech(),
            Some(&Speech::Plain {
                text: "hello".to_string()
            })
        );

        let value: Value = serde_json::from_str(&response.build(&Session::default()).unwrap()).unwrap();
        assert_eq!(value["response"]["outputSpeech"]["type"], "PlainText");
        assert_eq!(value["response"]["outputSpeech"]["text"], "hello");
    }

    #[test]
    fn tell_detects_ssml() {
        let mut response = Response::new();
        response.tell("<speak>hello</speak>");

        let value: Value = serde_json::from_str(&response.build(&Session::default()).unwrap()).unwrap();
        assert_eq!(value["response"]["outputSpeech"]["type"], "SSML");
        assert_eq!(value["response"]["outputSpeech"]["ssml"], "<speak>hello</speak>");
    }

    #[test]
    fn ask_keeps_the_session_open() {
        let mut response = Response::new();
        assert!(response.should_end_session());

        response.ask("which city?");
        assert!(!response.should_end_session());

        let value: Value = serde_json::from_str(&response.build(&Session::default()).unwrap()).unwrap();
        assert_eq!(value["response"]["shouldEndSession"], false);
    }

    #[test]
    fn ask_slot_appends_elicit_directive_after_commands() {
        let intent = Intent {
            name: "PlanTrip".to_string(),
            confidence: 1.0,
            slots: HashMap::new(),
        };
        let mut response = Response::with_dialog(Dialog::new(vec![intent]));
        response.command(Directive::audio_stop());
        response.ask_slot("what city?", "City");

        let envelope = response.to_envelope(&Session::default());
        let directives = &envelope.response.directives;
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].directive_type(), "AudioPlayer.Stop");
        assert_eq!(directives[1].directive_type(), "Dialog.ElicitSlot");
        match &directives[1] {
            Directive::DialogElicitSlot { slot_to_elicit, .. } => {
                assert_eq!(slot_to_elicit, "City");
            }
            other => panic!("unexpected directive: {other:?}"),
        }
    }

    #[test]
    fn build_echoes_session_attributes() {
        let mut session = Session::default();
        session.set_attribute("count", 2);

        let mut response = Response::new();
        response.tell("ok");

        let value: Value = serde_json::from_str(&response.build(&session).unwrap()).unwrap();
        assert_eq!(value["version"], "2.0");
        assert_eq!(value["session"]["attributes"]["count"], 2);
    }

    #[test]
    fn context_intent_present_only_with_dialog() {
        let bare = Response::new().to_envelope(&Session::default());
        assert!(bare.context.is_none());

        let intent = Intent {
            name: "PlanTrip".to_string(),
            confidence: 0.5,
            slots: HashMap::new(),
        };
        let with_intent =
            Response::with_dialog(Dialog::new(vec![intent])).to_envelope(&Session::default());
        assert_eq!(
            with_intent.context.map(|c| c.intent.name),
            Some("PlanTrip".to_string())
        );
    }

    #[test]
    fn empty_response_is_still_valid() {
        let value: Value =
            serde_json::from_str(&Response::new().build(&Session::default()).unwrap()).unwrap();
        assert_eq!(value["version"], "2.0");
        assert!(value["response"].get("outputSpeech").is_none());
        assert!(value["response"].get("directives").is_none());
        assert_eq!(value["response"]["shouldEndSession"], true);
    }

    #[test]
    fn build_twice_re_reads_current_state() {
        let session = Session::default();
        let mut response = Response::new();
        response.tell("first");
        let first = response.build(&session).unwrap();

        response.tell("second");
        let second = response.build(&session).unwrap();

        assert!(first.contains("first"));
        assert!(second.contains("second"));
    }

    #[test]
    fn display_card_is_passed_through() {
        let mut response = Response::new();
        response.display_card(json!({"type": "Simple", "title": "Trip"}));

        let value: Value = serde_json::from_str(&response.build(&Session::default()).unwrap()).unwrap();
        assert_eq!(value["response"]["card"]["title"], "Trip");
    }
}
