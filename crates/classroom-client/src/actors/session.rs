//! `ClassroomSessionActor` - one actor per joined class.
//!
//! The actor owns all mutable session state and is the only place it changes.
//! It reduces one [`SessionEvent`] at a time, multiplexing:
//!
//! - the countdown interval (`SessionEvent::Tick`)
//! - the transport subscription (metadata, roster, data messages)
//! - commands from [`ClassroomSessionHandle`]
//!
//! # Device ownership
//!
//! Each capture device has an effective intent of
//! `wanted && !waiting && !locked`, with the waiting room taking precedence
//! over host locks and host locks over the user's toggle. A lock that forces a
//! device off clears the user's preference, so lifting the lock leaves the
//! device off until the user turns it back on. The waiting room only
//! overrides; leaving it restores the preference.
//!
//! # Lifecycle
//!
//! 1. Spawned with a connected transport after a successful join
//! 2. Runs until `leave()`, a transport disconnect, cancellation, or every
//!    handle being dropped
//! 3. Teardown drops the transport subscription and the countdown interval

use crate::bootstrap::{ConnectionGrant, LessonResource};
use crate::config::Config;
use crate::control::ControlState;
use crate::countdown::Countdown;
use crate::errors::{ClassroomError, DeviceLockReason};
use crate::events::{extension_notice, EphemeralMessage};
use crate::join_window::{JoinPhase, JoinWindowPolicy, DEFAULT_JOIN_LEAD};
use crate::observability::metrics;
use crate::presence::Roster;
use crate::transport::{
    CaptureDevice, Reliability, Subscription, Transport, TransportError, TransportEvent,
};

use super::messages::{
    RosterDelta, SessionEvent, SessionMessage, SessionNotification, SessionView,
};

use chrono::{DateTime, Utc};
use common::clock::Clock;
use common::types::{LessonId, ParticipantIdentity};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Mailbox size for handle commands.
const SESSION_CHANNEL_BUFFER: usize = 64;

/// Buffer for UI notifications. Notices are dropped, not awaited, when full.
const NOTIFICATION_BUFFER: usize = 32;

/// Default countdown cadence.
pub const DEFAULT_COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Per-lesson facts produced by the join request.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub lesson_id: LessonId,
    /// Scheduled start, when known. Without it the phase is only ever
    /// `Live` or `Ended`.
    pub scheduled_start: Option<DateTime<Utc>>,
    pub host_identity: ParticipantIdentity,
    pub is_host: bool,
    pub effective_end: DateTime<Utc>,
    pub resources: Vec<LessonResource>,
}

impl SessionContext {
    /// Build the context from a connection grant.
    #[must_use]
    pub fn from_grant(
        lesson_id: LessonId,
        grant: &ConnectionGrant,
        scheduled_start: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            lesson_id,
            scheduled_start,
            host_identity: grant.host_identity.clone(),
            is_host: grant.is_host,
            effective_end: grant.effective_end,
            resources: grant.resources.clone(),
        }
    }
}

/// Tunables for a session actor.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub join_lead: chrono::Duration,
    pub countdown_tick: Duration,
    pub start_with_microphone: bool,
    pub start_with_camera: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            join_lead: DEFAULT_JOIN_LEAD,
            countdown_tick: DEFAULT_COUNTDOWN_TICK,
            start_with_microphone: true,
            start_with_camera: true,
        }
    }
}

impl SessionSettings {
    /// Derive settings from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClassroomError::Config` if the join lead does not fit a
    /// `chrono::Duration`.
    pub fn from_config(config: &Config) -> Result<Self, ClassroomError> {
        Ok(Self {
            join_lead: chrono::Duration::from_std(config.join_lead)
                .map_err(|e| ClassroomError::Config(format!("join lead out of range: {e}")))?,
            countdown_tick: config.countdown_tick,
            start_with_microphone: config.start_with_microphone,
            start_with_camera: config.start_with_camera,
        })
    }
}

/// Handle to a `ClassroomSessionActor`.
#[derive(Clone, Debug)]
pub struct ClassroomSessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    cancel_token: CancellationToken,
    lesson_id: LessonId,
    view: watch::Receiver<SessionView>,
}

impl ClassroomSessionHandle {
    /// Get the lesson ID.
    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    /// Broadcast a raise-hand request. Every call sends exactly one message.
    pub async fn raise_hand(&self) -> Result<(), ClassroomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SessionMessage::RaiseHand { respond_to: tx })
            .await
            .map_err(|_| ClassroomError::SessionClosed)?;

        rx.await.map_err(|_| ClassroomError::SessionClosed)?
    }

    /// Turn the microphone on or off.
    pub async fn set_microphone(&self, enabled: bool) -> Result<(), ClassroomError> {
        self.set_device(CaptureDevice::Microphone, enabled).await
    }

    /// Turn the camera on or off.
    pub async fn set_camera(&self, enabled: bool) -> Result<(), ClassroomError> {
        self.set_device(CaptureDevice::Camera, enabled).await
    }

    /// User toggle of a capture device.
    ///
    /// Enabling is refused with `ClassroomError::DeviceLocked` while the
    /// waiting room or a host lock forbids the device. Disabling always
    /// succeeds.
    pub async fn set_device(
        &self,
        device: CaptureDevice,
        enabled: bool,
    ) -> Result<(), ClassroomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SessionMessage::SetDevice {
                device,
                enabled,
                respond_to: tx,
            })
            .await
            .map_err(|_| ClassroomError::SessionClosed)?;

        rx.await.map_err(|_| ClassroomError::SessionClosed)?
    }

    /// Latest published view, without waiting for the actor.
    #[must_use]
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Receiver that observes every published view.
    #[must_use]
    pub fn subscribe_view(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// View after the actor has handled everything queued before this call.
    pub async fn get_view(&self) -> Result<SessionView, ClassroomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SessionMessage::GetView { respond_to: tx })
            .await
            .map_err(|_| ClassroomError::SessionClosed)?;

        rx.await.map_err(|_| ClassroomError::SessionClosed)
    }

    /// Lesson resources from the grant.
    #[must_use]
    pub fn resources(&self) -> Arc<[LessonResource]> {
        Arc::clone(&self.view.borrow().resources)
    }

    /// Leave the class. Returns once the transport subscription is dropped.
    pub async fn leave(&self) -> Result<(), ClassroomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SessionMessage::Leave { respond_to: tx })
            .await
            .map_err(|_| ClassroomError::SessionClosed)?;

        rx.await.map_err(|_| ClassroomError::SessionClosed)
    }

    /// Cancel the session actor.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Check if the actor is cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

#[derive(Debug, Clone, Copy)]
struct DeviceState {
    /// The user's preference.
    wanted: bool,
    /// Last intent the transport accepted. `None` until the first one.
    enabled: Option<bool>,
}

impl DeviceState {
    fn new(wanted: bool) -> Self {
        Self {
            wanted,
            enabled: None,
        }
    }

    fn is_on(self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy)]
struct Devices {
    microphone: DeviceState,
    camera: DeviceState,
}

impl Devices {
    fn get_mut(&mut self, device: CaptureDevice) -> &mut DeviceState {
        match device {
            CaptureDevice::Microphone => &mut self.microphone,
            CaptureDevice::Camera => &mut self.camera,
        }
    }
}

/// The `ClassroomSessionActor` implementation.
pub struct ClassroomSessionActor {
    lesson_id: LessonId,
    scheduled_start: Option<DateTime<Utc>>,
    policy: JoinWindowPolicy,
    /// Replaced, never summed, by `TIME_EXTENDED`.
    effective_end: DateTime<Utc>,
    resources: Arc<[LessonResource]>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    subscription: Subscription,
    receiver: mpsc::Receiver<SessionMessage>,
    notifications: mpsc::Sender<SessionNotification>,
    view: watch::Sender<SessionView>,
    cancel_token: CancellationToken,
    countdown_tick: Duration,
    roster: Roster,
    /// Last-known-good control state.
    control: ControlState,
    devices: Devices,
    waiting: bool,
    /// Whether `ClassEnded` was sent for the current effective end.
    ended_announced: bool,
    leave_ack: Option<oneshot::Sender<()>>,
}

impl ClassroomSessionActor {
    /// Spawn a session actor over a connected transport.
    ///
    /// Subscribes to the transport and applies the initial roster and control
    /// state before returning, so the handle's first view is already
    /// reconciled.
    ///
    /// Returns the handle, the notification stream and the task join handle.
    ///
    /// # Errors
    ///
    /// Returns `ClassroomError::Transport` if the transport refuses the
    /// subscription.
    pub fn spawn(
        context: SessionContext,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        settings: SessionSettings,
        cancel_token: CancellationToken,
    ) -> Result<
        (
            ClassroomSessionHandle,
            mpsc::Receiver<SessionNotification>,
            JoinHandle<()>,
        ),
        ClassroomError,
    > {
        let subscription = transport
            .subscribe()
            .map_err(|e| ClassroomError::Transport(e.to_string()))?;

        let (sender, receiver) = mpsc::channel(SESSION_CHANNEL_BUFFER);
        let (notify_tx, notify_rx) = mpsc::channel(NOTIFICATION_BUFFER);

        let roster = Roster::new(
            context.host_identity,
            context.is_host,
            transport.remote_participants(),
        );
        let resources: Arc<[LessonResource]> = context.resources.into();
        let initial_view = SessionView {
            lesson_id: context.lesson_id,
            phase: JoinPhase::Live,
            waiting_for_host: false,
            host_present: roster.host_present(),
            control: ControlState::default(),
            microphone_enabled: false,
            camera_enabled: false,
            effective_end: context.effective_end,
            countdown: Countdown::between(clock.now(), context.effective_end),
            participants: roster.remote_count(),
            resources: Arc::clone(&resources),
        };
        let (view_tx, view_rx) = watch::channel(initial_view);

        let mut actor = Self {
            lesson_id: context.lesson_id,
            scheduled_start: context.scheduled_start,
            policy: JoinWindowPolicy::new(settings.join_lead),
            effective_end: context.effective_end,
            resources,
            transport,
            clock,
            subscription,
            receiver,
            notifications: notify_tx,
            view: view_tx,
            cancel_token: cancel_token.clone(),
            countdown_tick: settings.countdown_tick,
            roster,
            control: ControlState::default(),
            devices: Devices {
                microphone: DeviceState::new(settings.start_with_microphone),
                camera: DeviceState::new(settings.start_with_camera),
            },
            waiting: false,
            ended_announced: false,
            leave_ack: None,
        };

        actor.start();

        let handle = ClassroomSessionHandle {
            sender,
            cancel_token,
            lesson_id: actor.lesson_id,
            view: view_rx,
        };

        let task_handle = tokio::spawn(actor.run());

        Ok((handle, notify_rx, task_handle))
    }

    /// Initial reconciliation from the transport's current state.
    fn start(&mut self) {
        if let Some(raw) = self.transport.room_metadata() {
            match ControlState::parse(&raw) {
                Some(control) => self.control = control,
                None => {
                    warn!(
                        target: "classroom.session",
                        lesson_id = %self.lesson_id,
                        "Initial room metadata is not a control document, assuming unlocked"
                    );
                    metrics::record_control_metadata_rejected();
                }
            }
        }

        info!(
            target: "classroom.session",
            lesson_id = %self.lesson_id,
            host_present = self.roster.host_present(),
            participants = self.roster.remote_count(),
            mic_locked = self.control.mic_locked,
            camera_locked = self.control.camera_locked,
            "Session starting"
        );

        if self.roster.host_present() {
            self.restore_devices();
        } else {
            self.enter_waiting();
        }

        self.publish_view();
    }

    /// Run the actor message loop.
    #[instrument(
        skip_all,
        name = "classroom.actor.session",
        fields(lesson_id = %self.lesson_id)
    )]
    async fn run(mut self) {
        debug!(
            target: "classroom.session",
            lesson_id = %self.lesson_id,
            "ClassroomSessionActor started"
        );

        let mut countdown = tokio::time::interval(self.countdown_tick);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let stop_reason = loop {
            tokio::select! {
                // Handle cancellation
                () = self.cancel_token.cancelled() => {
                    break "cancelled";
                }

                _ = countdown.tick() => {
                    self.reduce(SessionEvent::Tick);
                }

                event = self.subscription.next() => {
                    match event {
                        Some(TransportEvent::Disconnected { reason }) => {
                            info!(
                                target: "classroom.session",
                                lesson_id = %self.lesson_id,
                                reason = %reason,
                                "Transport disconnected"
                            );
                            self.notify(SessionNotification::Disconnected { reason });
                            break "transport disconnected";
                        }
                        Some(event) => {
                            if let Some(event) = SessionEvent::from_transport(event) {
                                self.reduce(event);
                            }
                        }
                        None => {
                            debug!(
                                target: "classroom.session",
                                lesson_id = %self.lesson_id,
                                "Transport subscription closed"
                            );
                            break "subscription closed";
                        }
                    }
                }

                // Handle commands
                msg = self.receiver.recv() => {
                    match msg {
                        Some(message) => {
                            if self.handle_message(message) {
                                break "left";
                            }
                        }
                        None => {
                            debug!(
                                target: "classroom.session",
                                lesson_id = %self.lesson_id,
                                "All session handles dropped"
                            );
                            break "handles dropped";
                        }
                    }
                }
            }
        };

        // Dropping the subscription unsubscribes from metadata and data messages
        drop(countdown);
        self.subscription.unsubscribe();

        info!(
            target: "classroom.session",
            lesson_id = %self.lesson_id,
            reason = stop_reason,
            "ClassroomSessionActor stopped"
        );

        if let Some(ack) = self.leave_ack.take() {
            let _ = ack.send(());
        }
    }

    /// Handle a single command. Returns true if the actor should exit.
    fn handle_message(&mut self, message: SessionMessage) -> bool {
        match message {
            SessionMessage::RaiseHand { respond_to } => {
                let _ = respond_to.send(self.raise_hand());
                false
            }

            SessionMessage::SetDevice {
                device,
                enabled,
                respond_to,
            } => {
                let result = self.set_device_by_user(device, enabled);
                self.publish_view();
                let _ = respond_to.send(result);
                false
            }

            SessionMessage::GetView { respond_to } => {
                let _ = respond_to.send(self.current_view());
                false
            }

            SessionMessage::Leave { respond_to } => {
                info!(
                    target: "classroom.session",
                    lesson_id = %self.lesson_id,
                    "Leaving class"
                );
                self.leave_ack = Some(respond_to);
                true
            }
        }
    }

    /// Apply one event, then publish the resulting view.
    fn reduce(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::MetadataChanged(raw) => self.on_metadata_changed(&raw),
            SessionEvent::RosterChanged(delta) => self.on_roster_changed(delta),
            SessionEvent::EphemeralMessage { payload, sender } => {
                self.on_ephemeral_message(&payload, sender.as_ref());
            }
            SessionEvent::Tick => self.on_tick(),
        }
        self.publish_view();
    }

    fn on_metadata_changed(&mut self, raw: &str) {
        let Some(control) = ControlState::parse(raw) else {
            warn!(
                target: "classroom.session",
                lesson_id = %self.lesson_id,
                len = raw.len(),
                "Ignoring malformed control metadata, keeping last known state"
            );
            metrics::record_control_metadata_rejected();
            return;
        };

        if control != self.control {
            info!(
                target: "classroom.session",
                lesson_id = %self.lesson_id,
                mic_locked = control.mic_locked,
                camera_locked = control.camera_locked,
                "Control state changed"
            );
        }
        self.control = control;

        // The waiting room already holds both devices off; locks are applied
        // when it is left
        if !self.waiting {
            self.enforce_locks();
        }
    }

    fn on_roster_changed(&mut self, delta: RosterDelta) {
        match delta {
            RosterDelta::Connected(identity) => {
                debug!(
                    target: "classroom.session",
                    lesson_id = %self.lesson_id,
                    participant = %identity,
                    "Participant connected"
                );
                self.roster.connected(identity);
            }
            RosterDelta::Disconnected(identity) => {
                debug!(
                    target: "classroom.session",
                    lesson_id = %self.lesson_id,
                    participant = %identity,
                    "Participant disconnected"
                );
                self.roster.disconnected(&identity);
            }
        }

        let should_wait = !self.roster.host_present();
        if should_wait && !self.waiting {
            self.enter_waiting();
        } else if should_wait {
            // Still waiting; re-issue any override the transport refused
            self.hold_devices_off();
        } else if self.waiting {
            self.leave_waiting();
        }
    }

    fn on_ephemeral_message(&mut self, payload: &[u8], sender: Option<&ParticipantIdentity>) {
        let Some(message) = EphemeralMessage::decode(payload) else {
            debug!(
                target: "classroom.session",
                lesson_id = %self.lesson_id,
                len = payload.len(),
                "Ignoring undecodable data message"
            );
            metrics::record_ephemeral_message("malformed");
            return;
        };

        metrics::record_ephemeral_message(message.kind());

        match message {
            EphemeralMessage::TimeExtended {
                new_end_time,
                minutes,
            } => {
                info!(
                    target: "classroom.session",
                    lesson_id = %self.lesson_id,
                    previous_end = %self.effective_end,
                    new_end = %new_end_time,
                    minutes = minutes,
                    "Class time extended"
                );
                self.effective_end = new_end_time;
                if new_end_time > self.clock.now() {
                    self.ended_announced = false;
                }
                self.notify(SessionNotification::TimeExtended {
                    minutes,
                    new_end: new_end_time,
                    message: extension_notice(minutes),
                });
            }
            EphemeralMessage::RaiseHand | EphemeralMessage::Unknown => {
                debug!(
                    target: "classroom.session",
                    lesson_id = %self.lesson_id,
                    kind = message.kind(),
                    sender = ?sender,
                    "Ignoring data message"
                );
            }
        }
    }

    fn on_tick(&mut self) {
        if self.phase(self.clock.now()) == JoinPhase::Ended && !self.ended_announced {
            self.ended_announced = true;
            info!(
                target: "classroom.session",
                lesson_id = %self.lesson_id,
                effective_end = %self.effective_end,
                "Class time is over"
            );
            self.notify(SessionNotification::ClassEnded);
        }
    }

    fn enter_waiting(&mut self) {
        self.waiting = true;
        info!(
            target: "classroom.session",
            lesson_id = %self.lesson_id,
            host = %self.roster.host_identity(),
            "Host not in room, waiting"
        );
        self.hold_devices_off();
        self.notify(SessionNotification::WaitingForHost);
    }

    /// Force both devices off while waiting. The preference survives.
    fn hold_devices_off(&mut self) {
        for device in CaptureDevice::ALL {
            // A rejection leaves the recorded intent, so the next delta retries
            let _ = self.apply_device(device, false, Some("waiting"));
        }
    }

    fn leave_waiting(&mut self) {
        self.waiting = false;
        info!(
            target: "classroom.session",
            lesson_id = %self.lesson_id,
            "Host arrived"
        );
        self.restore_devices();
        self.notify(SessionNotification::HostArrived);
    }

    /// Re-apply the last known control state and the user's preferences.
    fn restore_devices(&mut self) {
        for device in CaptureDevice::ALL {
            if self.control.is_locked(device) {
                self.devices.get_mut(device).wanted = false;
                let _ = self.apply_device(device, false, Some("lock"));
            } else {
                let wanted = self.devices.get_mut(device).wanted;
                let _ = self.apply_device(device, wanted, None);
            }
        }
    }

    /// Force locked devices off. Never enables anything.
    fn enforce_locks(&mut self) {
        for device in CaptureDevice::ALL {
            if self.control.is_locked(device) {
                self.devices.get_mut(device).wanted = false;
                let _ = self.apply_device(device, false, Some("lock"));
            }
        }
    }

    fn set_device_by_user(
        &mut self,
        device: CaptureDevice,
        enabled: bool,
    ) -> Result<(), ClassroomError> {
        if enabled {
            let refused = if self.waiting {
                Some(DeviceLockReason::WaitingForHost)
            } else if self.control.is_locked(device) {
                Some(DeviceLockReason::LockedByHost)
            } else {
                None
            };
            if let Some(reason) = refused {
                debug!(
                    target: "classroom.session",
                    lesson_id = %self.lesson_id,
                    device = %device,
                    reason = %reason,
                    "Refusing device enable"
                );
                return Err(ClassroomError::DeviceLocked { device, reason });
            }
        }

        self.devices.get_mut(device).wanted = enabled;
        self.apply_device(device, enabled, None)
            .map_err(|e| ClassroomError::Transport(e.to_string()))
    }

    /// Issue a device intent if it differs from the last accepted one.
    ///
    /// Rejections are logged and leave the recorded intent unchanged, so the
    /// next reconciliation retries.
    fn apply_device(
        &mut self,
        device: CaptureDevice,
        enabled: bool,
        override_reason: Option<&'static str>,
    ) -> Result<(), TransportError> {
        let state = self.devices.get_mut(device);
        if state.enabled == Some(enabled) {
            return Ok(());
        }

        match self.transport.set_device_enabled(device, enabled) {
            Ok(()) => {
                state.enabled = Some(enabled);
                if let Some(reason) = override_reason {
                    metrics::record_device_override(device.as_str(), reason);
                }
                debug!(
                    target: "classroom.session",
                    lesson_id = %self.lesson_id,
                    device = %device,
                    enabled = enabled,
                    reason = override_reason.unwrap_or("user"),
                    "Device intent applied"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    target: "classroom.session",
                    lesson_id = %self.lesson_id,
                    device = %device,
                    enabled = enabled,
                    error = %e,
                    "Transport rejected device intent"
                );
                Err(e)
            }
        }
    }

    fn raise_hand(&self) -> Result<(), ClassroomError> {
        let payload = EphemeralMessage::RaiseHand.encode()?;
        self.transport
            .publish_data(payload, Reliability::Reliable)
            .map_err(|e| {
                warn!(
                    target: "classroom.session",
                    lesson_id = %self.lesson_id,
                    error = %e,
                    "Failed to publish raise hand"
                );
                ClassroomError::Transport(e.to_string())
            })?;

        info!(
            target: "classroom.session",
            lesson_id = %self.lesson_id,
            "Hand raised"
        );
        Ok(())
    }

    fn phase(&self, now: DateTime<Utc>) -> JoinPhase {
        match self.scheduled_start {
            Some(start) => self.policy.classify(now, start, self.effective_end),
            None if now > self.effective_end => JoinPhase::Ended,
            None => JoinPhase::Live,
        }
    }

    fn current_view(&self) -> SessionView {
        let now = self.clock.now();
        SessionView {
            lesson_id: self.lesson_id,
            phase: self.phase(now),
            waiting_for_host: self.waiting,
            host_present: self.roster.host_present(),
            control: self.control,
            microphone_enabled: self.devices.microphone.is_on(),
            camera_enabled: self.devices.camera.is_on(),
            effective_end: self.effective_end,
            countdown: Countdown::between(now, self.effective_end),
            participants: self.roster.remote_count(),
            resources: Arc::clone(&self.resources),
        }
    }

    fn publish_view(&self) {
        let view = self.current_view();
        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    fn notify(&self, notification: SessionNotification) {
        if let Err(e) = self.notifications.try_send(notification) {
            debug!(
                target: "classroom.session",
                lesson_id = %self.lesson_id,
                error = %e,
                "Dropping session notification"
            );
        }
    }
}
