//! Pre-connection lobby: re-evaluate the join phase on a fixed cadence.
//!
//! The watcher publishes the current [`JoinPhase`] on a `watch` channel. The
//! UI reads it to decide between the wait screen, the join button and the
//! "class has ended" notice. Subscribers only observe changes.

use crate::join_window::{JoinPhase, JoinWindowPolicy, SessionWindow};
use common::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Spawn a task that re-classifies `window` every `tick`.
///
/// The task stops when `cancel_token` is cancelled or every receiver has been
/// dropped. It never stops on its own once the phase reaches `Ended`, since
/// the lobby keeps showing the ended notice until the user leaves.
pub fn spawn_lobby_watcher(
    window: SessionWindow,
    policy: JoinWindowPolicy,
    clock: Arc<dyn Clock>,
    tick: Duration,
    cancel_token: CancellationToken,
) -> (JoinHandle<()>, watch::Receiver<JoinPhase>) {
    let initial = policy.classify(clock.now(), window.start(), window.end());
    let (sender, receiver) = watch::channel(initial);

    let handle = tokio::spawn(run(window, policy, clock, tick, sender, cancel_token));

    (handle, receiver)
}

#[instrument(skip_all, name = "classroom.lobby", fields(start = %window.start(), end = %window.end()))]
async fn run(
    window: SessionWindow,
    policy: JoinWindowPolicy,
    clock: Arc<dyn Clock>,
    tick: Duration,
    sender: watch::Sender<JoinPhase>,
    cancel_token: CancellationToken,
) {
    let initial = *sender.borrow();
    info!(target: "classroom.lobby", phase = %initial, "Lobby watcher started");

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => {
                debug!(target: "classroom.lobby", "Lobby watcher cancelled");
                break;
            }
            () = sender.closed() => {
                debug!(target: "classroom.lobby", "All lobby receivers dropped");
                break;
            }
            _ = interval.tick() => {
                let phase = policy.classify(clock.now(), window.start(), window.end());
                let changed = sender.send_if_modified(|current| {
                    if *current == phase {
                        false
                    } else {
                        *current = phase;
                        true
                    }
                });
                if changed {
                    info!(target: "classroom.lobby", phase = %phase, "Join phase changed");
                }
            }
        }
    }

    info!(target: "classroom.lobby", "Lobby watcher stopped");
}
