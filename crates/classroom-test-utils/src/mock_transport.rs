//! In-memory transport for session tests.
//!
//! Tests push [`TransportEvent`]s with [`MockTransport::emit`] and inspect the
//! device intents and data messages the session issued.

use classroom_client::transport::{
    CaptureDevice, Reliability, Subscription, Transport, TransportError, TransportEvent,
};
use common::types::ParticipantIdentity;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct Inner {
    participants: Vec<ParticipantIdentity>,
    metadata: Option<String>,
    device_calls: Vec<(CaptureDevice, bool)>,
    published: Vec<(Vec<u8>, Reliability)>,
    subscriptions: Vec<(mpsc::Sender<TransportEvent>, CancellationToken)>,
    reject_devices: bool,
    reject_subscribe: bool,
}

/// Mock transport. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    /// Empty room, no metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the remote roster seen at subscribe time.
    pub fn with_participants<I, P>(self, participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantIdentity>,
    {
        self.inner.lock().unwrap().participants = participants.into_iter().map(Into::into).collect();
        self
    }

    /// Seed the room metadata seen at subscribe time.
    pub fn with_metadata(self, metadata: impl Into<String>) -> Self {
        self.inner.lock().unwrap().metadata = Some(metadata.into());
        self
    }

    /// Reject every device intent.
    pub fn reject_devices(self) -> Self {
        self.inner.lock().unwrap().reject_devices = true;
        self
    }

    /// Switch device intent rejection on or off for an existing transport.
    pub fn set_reject_devices(&self, reject: bool) {
        self.inner.lock().unwrap().reject_devices = reject;
    }

    /// Refuse subscriptions.
    pub fn reject_subscribe(self) -> Self {
        self.inner.lock().unwrap().reject_subscribe = true;
        self
    }

    /// Shared transport for APIs that take `Arc<dyn Transport>`.
    pub fn clone_arc(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Push an event to every live subscription.
    ///
    /// Roster and metadata events also update what later subscribers see.
    pub fn emit(&self, event: TransportEvent) {
        let mut inner = self.inner.lock().unwrap();
        match &event {
            TransportEvent::ParticipantConnected(identity) => {
                if !inner.participants.contains(identity) {
                    inner.participants.push(identity.clone());
                }
            }
            TransportEvent::ParticipantDisconnected(identity) => {
                inner.participants.retain(|p| p != identity);
            }
            TransportEvent::MetadataChanged(raw) => inner.metadata = Some(raw.clone()),
            TransportEvent::DataReceived { .. } | TransportEvent::Disconnected { .. } => {}
        }

        inner
            .subscriptions
            .retain(|(_, token)| !token.is_cancelled());
        for (sender, _) in &inner.subscriptions {
            sender
                .try_send(event.clone())
                .expect("subscription buffer full");
        }
    }

    /// Number of subscriptions that have not been dropped.
    pub fn active_subscriptions(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .subscriptions
            .iter()
            .filter(|(_, token)| !token.is_cancelled())
            .count()
    }

    /// Every device intent the session issued, in order.
    pub fn device_calls(&self) -> Vec<(CaptureDevice, bool)> {
        self.inner.lock().unwrap().device_calls.clone()
    }

    /// Device intents for one device, in order.
    pub fn calls_for(&self, device: CaptureDevice) -> Vec<bool> {
        self.device_calls()
            .into_iter()
            .filter(|(d, _)| *d == device)
            .map(|(_, enabled)| enabled)
            .collect()
    }

    /// Forget recorded device intents.
    pub fn clear_device_calls(&self) {
        self.inner.lock().unwrap().device_calls.clear();
    }

    /// Every data message the session published, in order.
    pub fn published(&self) -> Vec<(Vec<u8>, Reliability)> {
        self.inner.lock().unwrap().published.clone()
    }

    /// Published payloads decoded as JSON.
    pub fn published_json(&self) -> Vec<serde_json::Value> {
        self.published()
            .iter()
            .map(|(payload, _)| serde_json::from_slice(payload).expect("published payload is JSON"))
            .collect()
    }
}

impl Transport for MockTransport {
    fn subscribe(&self) -> Result<Subscription, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.reject_subscribe {
            return Err(TransportError::NotConnected);
        }
        let (sender, token, subscription) = Subscription::channel();
        inner.subscriptions.push((sender, token));
        Ok(subscription)
    }

    fn remote_participants(&self) -> Vec<ParticipantIdentity> {
        self.inner.lock().unwrap().participants.clone()
    }

    fn room_metadata(&self) -> Option<String> {
        self.inner.lock().unwrap().metadata.clone()
    }

    fn set_device_enabled(
        &self,
        device: CaptureDevice,
        enabled: bool,
    ) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.reject_devices {
            return Err(TransportError::Rejected(format!(
                "{device} is not available"
            )));
        }
        inner.device_calls.push((device, enabled));
        Ok(())
    }

    fn publish_data(&self, payload: Vec<u8>, reliability: Reliability) -> Result<(), TransportError> {
        self.inner.lock().unwrap().published.push((payload, reliability));
        Ok(())
    }
}
