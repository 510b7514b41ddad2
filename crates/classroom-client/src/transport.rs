//! Seam to the external real-time transport.
//!
//! The transport owns media, signaling and the room connection. The session
//! controller only needs four things from it:
//!
//! - the current remote roster and room metadata at connect time
//! - a push stream of roster, metadata and data-channel changes
//! - enable/disable intents for the local microphone and camera
//! - a way to publish ephemeral data messages
//!
//! Change notifications are delivered through a [`Subscription`]. The
//! subscription owns a `CancellationToken` that is cancelled when it is
//! dropped, so an implementation stops forwarding events as soon as the
//! controller tears down. Implementations must check the token before every
//! forward.

use common::types::ParticipantIdentity;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Buffer size for transport event subscriptions.
pub const SUBSCRIPTION_BUFFER: usize = 256;

/// A local capture device the controller may turn on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureDevice {
    Microphone,
    Camera,
}

impl CaptureDevice {
    /// Both devices, in the order the controller reconciles them.
    pub const ALL: [CaptureDevice; 2] = [CaptureDevice::Microphone, CaptureDevice::Camera];

    /// Returns the device as a string for metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CaptureDevice::Microphone => "microphone",
            CaptureDevice::Camera => "camera",
        }
    }
}

impl fmt::Display for CaptureDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery mode for published data messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reliability {
    Reliable,
    Lossy,
}

/// Change notification pushed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Room metadata was replaced (raw, unparsed document).
    MetadataChanged(String),
    /// A remote participant connected.
    ParticipantConnected(ParticipantIdentity),
    /// A remote participant disconnected.
    ParticipantDisconnected(ParticipantIdentity),
    /// An ephemeral data message arrived.
    DataReceived {
        payload: Vec<u8>,
        sender: Option<ParticipantIdentity>,
    },
    /// The room connection ended.
    Disconnected { reason: String },
}

/// Errors reported by a transport implementation.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The operation was refused (e.g. the OS denied camera access).
    #[error("Operation rejected: {0}")]
    Rejected(String),

    /// The room connection is gone.
    #[error("Not connected")]
    NotConnected,
}

/// Owned subscription to transport change notifications.
///
/// Dropping the subscription unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::Receiver<TransportEvent>,
    cancel_token: CancellationToken,
}

impl Subscription {
    /// Create a subscription from the receiving half of an event channel and
    /// the token the transport watches to stop forwarding.
    #[must_use]
    pub fn new(events: mpsc::Receiver<TransportEvent>, cancel_token: CancellationToken) -> Self {
        Self {
            events,
            cancel_token,
        }
    }

    /// Create a subscription together with the sender a transport pushes into.
    #[must_use]
    pub fn channel() -> (mpsc::Sender<TransportEvent>, CancellationToken, Self) {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let token = CancellationToken::new();
        (tx, token.clone(), Self::new(rx, token))
    }

    /// Wait for the next event. Returns `None` once the transport closed the
    /// channel or the subscription was cancelled.
    pub async fn next(&mut self) -> Option<TransportEvent> {
        if self.cancel_token.is_cancelled() {
            return None;
        }
        self.events.recv().await
    }

    /// Whether the subscription is still live.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.cancel_token.is_cancelled()
    }

    /// Explicitly unsubscribe. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        self.events.close();
    }
}

/// The external real-time transport, as seen by the session controller.
///
/// All methods are non-blocking intents: the transport applies them on its
/// own schedule and may reject them.
pub trait Transport: Send + Sync + 'static {
    /// Subscribe to roster, metadata and data-channel changes.
    fn subscribe(&self) -> Result<Subscription, TransportError>;

    /// Identities of the remote participants currently in the room.
    fn remote_participants(&self) -> Vec<ParticipantIdentity>;

    /// Current room metadata document, if any.
    fn room_metadata(&self) -> Option<String>;

    /// Request that a local capture device be enabled or disabled.
    fn set_device_enabled(&self, device: CaptureDevice, enabled: bool)
        -> Result<(), TransportError>;

    /// Broadcast a data message to all other participants.
    fn publish_data(&self, payload: Vec<u8>, reliability: Reliability)
        -> Result<(), TransportError>;
}
