//! Player-event request types shared by the audio and video players.

use serde::{Deserialize, Serialize};

/// What the device's player is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlayActivity {
    Playing,
    Paused,
    Stopped,
    Finished,
    #[default]
    Idle,
}

/// Player state reported in the envelope's `context` section.
///
/// Wire keys are PascalCase (`Token`, `OffsetInMilliseconds`,
/// `PlayActivity`), unlike the camelCase request fields. The offset here is
/// the device's current position and is independent of the offset carried by
/// the playback event itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerContext {
    /// Correlation token from the play directive that started this stream.
    #[serde(default)]
    pub token: String,
    /// Current playback position of the device.
    #[serde(default)]
    pub offset_in_milliseconds: u64,
    /// Current player activity.
    #[serde(default)]
    pub play_activity: PlayActivity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_context_uses_pascal_case_keys() {
        let raw = r#"{"Token": "token1", "OffsetInMilliseconds": 500, "PlayActivity": "PAUSED"}"#;
        let context: PlayerContext = serde_json::from_str(raw).unwrap();
        assert_eq!(context.token, "token1");
        assert_eq!(context.offset_in_milliseconds, 500);
        assert_eq!(context.play_activity, PlayActivity::Paused);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let context: PlayerContext = serde_json::from_str("{}").unwrap();
        assert_eq!(context, PlayerContext::default());
        assert_eq!(context.play_activity, PlayActivity::Idle);
    }
}
