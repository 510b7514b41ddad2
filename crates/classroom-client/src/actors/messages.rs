//! Message types for the session actor.
//!
//! - [`SessionMessage`]: commands sent through a [`super::ClassroomSessionHandle`]
//! - [`SessionEvent`]: the tagged union the actor reduces over
//! - [`SessionNotification`]: transient notices for the UI
//! - [`SessionView`]: state snapshot published after every reducer step

use crate::bootstrap::LessonResource;
use crate::control::ControlState;
use crate::countdown::Countdown;
use crate::errors::ClassroomError;
use crate::join_window::JoinPhase;
use crate::transport::{CaptureDevice, TransportEvent};
use chrono::{DateTime, Utc};
use common::types::{LessonId, ParticipantIdentity};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Commands accepted by the session actor.
#[derive(Debug)]
pub enum SessionMessage {
    /// Broadcast one `RAISE_HAND` message.
    RaiseHand {
        respond_to: oneshot::Sender<Result<(), ClassroomError>>,
    },

    /// User toggle of a capture device.
    SetDevice {
        device: CaptureDevice,
        enabled: bool,
        respond_to: oneshot::Sender<Result<(), ClassroomError>>,
    },

    /// Snapshot the view after every previously queued message was handled.
    GetView {
        respond_to: oneshot::Sender<SessionView>,
    },

    /// Leave the class. Acknowledged once the subscription is dropped.
    Leave { respond_to: oneshot::Sender<()> },
}

/// A roster delta from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterDelta {
    Connected(ParticipantIdentity),
    Disconnected(ParticipantIdentity),
}

/// Everything that changes session state, other than user commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MetadataChanged(String),
    RosterChanged(RosterDelta),
    EphemeralMessage {
        payload: Vec<u8>,
        sender: Option<ParticipantIdentity>,
    },
    Tick,
}

impl SessionEvent {
    /// Map a transport event onto the reducer's input.
    ///
    /// `Disconnected` is not a state change; it ends the session and returns
    /// `None`.
    #[must_use]
    pub fn from_transport(event: TransportEvent) -> Option<Self> {
        match event {
            TransportEvent::MetadataChanged(raw) => Some(SessionEvent::MetadataChanged(raw)),
            TransportEvent::ParticipantConnected(identity) => Some(SessionEvent::RosterChanged(
                RosterDelta::Connected(identity),
            )),
            TransportEvent::ParticipantDisconnected(identity) => Some(
                SessionEvent::RosterChanged(RosterDelta::Disconnected(identity)),
            ),
            TransportEvent::DataReceived { payload, sender } => {
                Some(SessionEvent::EphemeralMessage { payload, sender })
            }
            TransportEvent::Disconnected { .. } => None,
        }
    }
}

/// Transient notices surfaced to the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotification {
    /// The host is not in the room; capture devices are off.
    WaitingForHost,

    /// The host joined; devices are back to the user's preference.
    HostArrived,

    /// The class end time moved.
    TimeExtended {
        minutes: u32,
        new_end: DateTime<Utc>,
        message: String,
    },

    /// The effective end passed. Sent once per end time.
    ClassEnded,

    /// The transport dropped the connection; the session is over.
    Disconnected { reason: String },
}

/// Snapshot of the session as the UI should render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub lesson_id: LessonId,
    pub phase: JoinPhase,
    pub waiting_for_host: bool,
    pub host_present: bool,
    pub control: ControlState,
    /// Last intent issued to the transport for the microphone.
    pub microphone_enabled: bool,
    /// Last intent issued to the transport for the camera.
    pub camera_enabled: bool,
    pub effective_end: DateTime<Utc>,
    pub countdown: Countdown,
    /// Remote participants currently connected.
    pub participants: usize,
    pub resources: Arc<[LessonResource]>,
}

impl SessionView {
    /// Intent for a given device.
    #[must_use]
    pub const fn device_enabled(&self, device: CaptureDevice) -> bool {
        match device {
            CaptureDevice::Microphone => self.microphone_enabled,
            CaptureDevice::Camera => self.camera_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_events_map_to_session_events() {
        assert_eq!(
            SessionEvent::from_transport(TransportEvent::MetadataChanged("{}".to_string())),
            Some(SessionEvent::MetadataChanged("{}".to_string()))
        );
        assert_eq!(
            SessionEvent::from_transport(TransportEvent::ParticipantConnected("tutor".into())),
            Some(SessionEvent::RosterChanged(RosterDelta::Connected(
                "tutor".into()
            )))
        );
        assert_eq!(
            SessionEvent::from_transport(TransportEvent::ParticipantDisconnected("tutor".into())),
            Some(SessionEvent::RosterChanged(RosterDelta::Disconnected(
                "tutor".into()
            )))
        );
        assert_eq!(
            SessionEvent::from_transport(TransportEvent::DataReceived {
                payload: vec![1, 2],
                sender: None,
            }),
            Some(SessionEvent::EphemeralMessage {
                payload: vec![1, 2],
                sender: None,
            })
        );
    }

    #[test]
    fn test_disconnect_is_not_a_reducer_event() {
        assert_eq!(
            SessionEvent::from_transport(TransportEvent::Disconnected {
                reason: "server shutdown".to_string()
            }),
            None
        );
    }
}
