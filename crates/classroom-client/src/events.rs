//! Ephemeral broadcast messages exchanged over the transport's data channel.
//!
//! Wire format is UTF-8 JSON discriminated by `type`:
//!
//! ```text
//! {"type": "TIME_EXTENDED", "new_end_time": "2026-10-19T11:15:00Z", "minutes": 15}
//! {"type": "RAISE_HAND"}
//! ```
//!
//! Kinds this client does not know decode to [`EphemeralMessage::Unknown`]
//! and are ignored by the session, so new kinds never break old clients.

use crate::errors::ClassroomError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One-shot message broadcast to the participants currently in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EphemeralMessage {
    /// The class end time was moved. `new_end_time` is absolute.
    TimeExtended {
        new_end_time: DateTime<Utc>,
        minutes: u32,
    },

    /// A participant asks for the host's attention.
    RaiseHand,

    /// Any kind this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl EphemeralMessage {
    /// Decode a data-channel payload. Returns `None` for payloads that are not
    /// UTF-8 JSON or that carry a known kind with a bad body.
    #[must_use]
    pub fn decode(payload: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(payload).ok()?;
        serde_json::from_str(text).ok()
    }

    /// Encode for publishing.
    pub fn encode(&self) -> Result<Vec<u8>, ClassroomError> {
        serde_json::to_vec(self)
            .map_err(|e| ClassroomError::Internal(format!("encode ephemeral message: {e}")))
    }

    /// Returns the message kind as a string for metric labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            EphemeralMessage::TimeExtended { .. } => "time_extended",
            EphemeralMessage::RaiseHand => "raise_hand",
            EphemeralMessage::Unknown => "unknown",
        }
    }
}

/// Learner-facing text announcing an extension.
#[must_use]
pub fn extension_notice(minutes: u32) -> String {
    if minutes == 1 {
        "Class extended by 1 minute".to_string()
    } else {
        format!("Class extended by {minutes} minutes")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_time_extended() {
        let payload = br#"{"type":"TIME_EXTENDED","new_end_time":"2026-10-19T11:15:00Z","minutes":15}"#;
        let message = EphemeralMessage::decode(payload).unwrap();
        assert_eq!(
            message,
            EphemeralMessage::TimeExtended {
                new_end_time: Utc.with_ymd_and_hms(2026, 10, 19, 11, 15, 0).unwrap(),
                minutes: 15,
            }
        );
    }

    #[test]
    fn test_decode_accepts_offset_timestamps() {
        let payload =
            br#"{"type":"TIME_EXTENDED","new_end_time":"2026-10-19T13:15:00+02:00","minutes":15}"#;
        let Some(EphemeralMessage::TimeExtended { new_end_time, .. }) =
            EphemeralMessage::decode(payload)
        else {
            panic!("expected TIME_EXTENDED");
        };
        assert_eq!(
            new_end_time,
            Utc.with_ymd_and_hms(2026, 10, 19, 11, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_unknown_kind_decodes_to_unknown() {
        let payload = br#"{"type":"POLL_STARTED","question":"Ready?"}"#;
        assert_eq!(
            EphemeralMessage::decode(payload),
            Some(EphemeralMessage::Unknown)
        );
    }

    #[test]
    fn test_malformed_payloads_are_rejected() {
        assert_eq!(EphemeralMessage::decode(b"\xff\xfe"), None);
        assert_eq!(EphemeralMessage::decode(b"hello"), None);
        assert_eq!(EphemeralMessage::decode(br#"{"minutes":5}"#), None);
        assert_eq!(
            EphemeralMessage::decode(br#"{"type":"TIME_EXTENDED","minutes":5}"#),
            None
        );
    }

    #[test]
    fn test_raise_hand_wire_format() {
        let bytes = EphemeralMessage::RaiseHand.encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, serde_json::json!({"type": "RAISE_HAND"}));
    }

    #[test]
    fn test_extension_notice_contains_minutes() {
        assert_eq!(extension_notice(15), "Class extended by 15 minutes");
        assert_eq!(extension_notice(1), "Class extended by 1 minute");
    }
}
