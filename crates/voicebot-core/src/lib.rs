//! Core domain models for the voicebot SDK.
//!
//! This crate holds everything that describes the protocol contract with the
//! voice-assistant platform: the request envelope and session state, the
//! classified request variants, dialog/slot-filling state, device directives,
//! and the response builder that serializes the outgoing envelope.
//!
//! The dispatch layer (registering handlers and running them against a
//! classified request) lives in the `voicebot` crate.

pub mod dialog;
pub mod directive;
pub mod envelope;
pub mod error;
pub mod request;
pub mod response;

// Re-export common error type
pub use error::{BotError, Result};

/// Protocol version stamped on every outgoing response envelope.
pub const PROTOCOL_VERSION: &str = "2.0";
