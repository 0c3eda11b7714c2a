//! Dialog and slot-filling state.
//!
//! An intent request carries one or more [`Intent`] entries, each with a
//! confidence score and a slot map. During one turn a handler may ask the
//! user to supply a missing slot ([`Dialog::elicit_slot`]); the pending
//! elicitation is turned into a `Dialog.ElicitSlot` directive when the
//! response is built, carrying the updated intent so the platform can route
//! the user's answer back into the same intent on the next turn.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::directive::Directive;

/// Confirmation status of a slot value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfirmationStatus {
    /// The slot value has not been confirmed or denied.
    #[default]
    None,
    /// The user confirmed the slot value.
    Confirmed,
    /// The user denied the slot value.
    Denied,
}

/// A named parameter of an intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Slot name.
    pub name: String,
    /// Slot value; `None` while the slot is unfilled.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,
}

/// One recognized intent with its slot map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Intent name as declared in the interaction model.
    pub name: String,
    /// Recognition confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
    /// Slots keyed by slot name.
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Looks up a slot by name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    /// Convenience accessor for a slot's filled value.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name).and_then(|slot| slot.value.as_deref())
    }
}

/// Fill state of one slot within the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No value and no pending elicitation.
    Unfilled,
    /// A handler asked the user to supply this slot.
    ElicitationRequested,
    /// The slot carries a value.
    Filled,
}

/// Dialog state for one turn: the request's intents plus at most one
/// pending slot elicitation (last write wins).
#[derive(Debug, Clone, Default)]
pub struct Dialog {
    intents: Vec<Intent>,
    pending_elicitation: Option<String>,
}

impl Dialog {
    /// Creates dialog state over the intents of an intent request.
    pub fn new(intents: Vec<Intent>) -> Self {
        Self {
            intents,
            pending_elicitation: None,
        }
    }

    /// The primary (first) intent of the request, if any.
    pub fn current_intent(&self) -> Option<&Intent> {
        self.intents.first()
    }

    /// All intents recognized for this turn.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Requests that the user be asked to supply `name` on the next turn.
    ///
    /// Calling this again before the response is built replaces the pending
    /// slot; at most one elicitation goes out per response.
    pub fn elicit_slot(&mut self, name: impl Into<String>) {
        self.pending_elicitation = Some(name.into());
    }

    /// The slot currently pending elicitation, if any.
    pub fn pending_slot(&self) -> Option<&str> {
        self.pending_elicitation.as_deref()
    }

    /// Fill state of `name` as of this point in the turn.
    pub fn slot_state(&self, name: &str) -> SlotState {
        if self.pending_elicitation.as_deref() == Some(name) {
            return SlotState::ElicitationRequested;
        }
        let filled = self
            .current_intent()
            .and_then(|intent| intent.slot_value(name))
            .is_some();
        if filled {
            SlotState::Filled
        } else {
            SlotState::Unfilled
        }
    }

    /// The `Dialog.ElicitSlot` directive for the pending elicitation.
    ///
    /// Returns `None` when no elicitation is pending. Reading the directive
    /// does not clear the pending state, so building a response twice yields
    /// the same directive both times.
    pub fn directive(&self) -> Option<Directive> {
        let slot = self.pending_elicitation.clone()?;
        Some(Directive::elicit_slot(slot, self.current_intent().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip_intent() -> Intent {
        let mut slots = HashMap::new();
        slots.insert(
            "city".to_string(),
            Slot {
                name: "city".to_string(),
                value: None,
                confirmation_status: ConfirmationStatus::None,
            },
        );
        slots.insert(
            "date".to_string(),
            Slot {
                name: "date".to_string(),
                value: Some("tomorrow".to_string()),
                confirmation_status: ConfirmationStatus::Confirmed,
            },
        );
        Intent {
            name: "PlanTrip".to_string(),
            confidence: 0.92,
            slots,
        }
    }

    #[test]
    fn slot_states_follow_fill_and_elicitation() {
        let mut dialog = Dialog::new(vec![trip_intent()]);

        assert_eq!(dialog.slot_state("date"), SlotState::Filled);
        assert_eq!(dialog.slot_state("city"), SlotState::Unfilled);

        dialog.elicit_slot("city");
        assert_eq!(dialog.slot_state("city"), SlotState::ElicitationRequested);
        assert_eq!(dialog.slot_state("date"), SlotState::Filled);
    }

    #[test]
    fn elicitation_is_last_wins() {
        let mut dialog = Dialog::new(vec![trip_intent()]);
        dialog.elicit_slot("date");
        dialog.elicit_slot("city");
        assert_eq!(dialog.pending_slot(), Some("city"));

        let directive = dialog.directive().expect("Should have pending directive");
        match directive {
            Directive::DialogElicitSlot {
                slot_to_elicit,
                updated_intent,
            } => {
                assert_eq!(slot_to_elicit, "city");
                assert_eq!(updated_intent.expect("Should carry intent").name, "PlanTrip");
            }
            other => panic!("unexpected directive: {other:?}"),
        }
    }

    #[test]
    fn no_pending_elicitation_means_no_directive() {
        let dialog = Dialog::new(vec![trip_intent()]);
        assert!(dialog.directive().is_none());
    }

    #[test]
    fn intent_slot_accessors() {
        let intent = trip_intent();
        assert_eq!(intent.slot_value("date"), Some("tomorrow"));
        assert_eq!(intent.slot_value("city"), None);
        assert!(intent.slot("missing").is_none());
    }
}
