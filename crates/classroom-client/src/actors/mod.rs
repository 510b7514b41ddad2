//! Session actor.
//!
//! One [`ClassroomSessionActor`] runs per joined class and owns every piece of
//! mutable session state. Callers interact with it only through a
//! [`ClassroomSessionHandle`].

pub mod messages;
pub mod session;

pub use messages::{RosterDelta, SessionEvent, SessionMessage, SessionNotification, SessionView};
pub use session::{
    ClassroomSessionActor, ClassroomSessionHandle, SessionContext, SessionSettings,
    DEFAULT_COUNTDOWN_TICK,
};
