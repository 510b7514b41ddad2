//! Control-lock channel carried in the room's shared metadata.
//!
//! Privileged participants write `{"mic_locked": bool, "camera_locked": bool}`
//! into the room metadata; every client reads it. The client never writes
//! this document. A document that does not parse is reported as `None` so the
//! caller keeps its last-known-good state.

use crate::transport::CaptureDevice;
use serde::{Deserialize, Serialize};

/// Device locks imposed by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub mic_locked: bool,
    pub camera_locked: bool,
}

impl ControlState {
    /// Parse a raw metadata document.
    ///
    /// Both keys are required and must be booleans. Unknown extra keys are
    /// allowed so the host side can add fields without breaking this client.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Whether the given device is locked.
    #[must_use]
    pub const fn is_locked(&self, device: CaptureDevice) -> bool {
        match device {
            CaptureDevice::Microphone => self.mic_locked,
            CaptureDevice::Camera => self.camera_locked,
        }
    }
}
