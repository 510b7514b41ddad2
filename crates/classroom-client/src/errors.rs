//! Classroom client error types.
//!
//! The "too early" join response is not an error; it is reported as
//! [`crate::bootstrap::JoinOutcome::Wait`]. Everything here is a hard
//! failure surfaced to the learner once, without automatic retry.
//! Internal details are logged but not exposed through `user_message`.

use crate::transport::CaptureDevice;
use std::fmt;
use thiserror::Error;

/// Why a user request to enable a capture device was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceLockReason {
    /// The host has not joined yet; all devices stay off.
    WaitingForHost,
    /// The room's control metadata locks this device.
    LockedByHost,
}

impl fmt::Display for DeviceLockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceLockReason::WaitingForHost => f.write_str("waiting for host"),
            DeviceLockReason::LockedByHost => f.write_str("locked by host"),
        }
    }
}

/// Classroom client error type.
#[derive(Debug, Error)]
pub enum ClassroomError {
    /// Network failure or unexpected HTTP status from the backend.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Backend rejected our credentials (401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend refused the join for a reason other than "too early" (403).
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Lesson does not exist or is not visible to this user (404).
    #[error("Lesson not found: {0}")]
    LessonNotFound(String),

    /// Backend answered with a body we could not interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Schedule strings could not be combined into a valid window.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// The join window has already closed.
    #[error("Lesson has ended")]
    LessonEnded,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The real-time transport refused an operation.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A device enable request was refused by an active override.
    #[error("{device} is unavailable: {reason}")]
    DeviceLocked {
        device: CaptureDevice,
        reason: DeviceLockReason,
    },

    /// The session actor has already shut down.
    #[error("Session closed")]
    SessionClosed,

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClassroomError {
    /// Returns a learner-facing message (no internal details).
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClassroomError::Http(_)
            | ClassroomError::InvalidResponse(_)
            | ClassroomError::Config(_)
            | ClassroomError::Internal(_) => {
                "Something went wrong while joining the class".to_string()
            }
            ClassroomError::Unauthorized(_) => "Please sign in again to join".to_string(),
            ClassroomError::PermissionDenied(_) => {
                "You are not enrolled in this class".to_string()
            }
            ClassroomError::LessonNotFound(_) => "This class could not be found".to_string(),
            ClassroomError::InvalidSchedule(_) => {
                "This class has an invalid schedule".to_string()
            }
            ClassroomError::LessonEnded => "This class has already ended".to_string(),
            ClassroomError::Transport(_) => "The live connection failed".to_string(),
            ClassroomError::DeviceLocked { device, reason } => match reason {
                DeviceLockReason::WaitingForHost => {
                    format!("Your {device} is off until the tutor joins")
                }
                DeviceLockReason::LockedByHost => {
                    format!("The tutor has disabled {device}s for this class")
                }
            },
            ClassroomError::SessionClosed => "You have left the class".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_hide_internal_details() {
        let http_err = ClassroomError::Http("connection refused at 10.0.3.7:443".to_string());
        assert!(!http_err.user_message().contains("10.0.3.7"));

        let body_err = ClassroomError::InvalidResponse("missing field `token`".to_string());
        assert!(!body_err.user_message().contains("token"));
    }

    #[test]
    fn test_device_locked_messages_name_the_device() {
        let waiting = ClassroomError::DeviceLocked {
            device: CaptureDevice::Microphone,
            reason: DeviceLockReason::WaitingForHost,
        };
        assert_eq!(
            waiting.user_message(),
            "Your microphone is off until the tutor joins"
        );

        let locked = ClassroomError::DeviceLocked {
            device: CaptureDevice::Camera,
            reason: DeviceLockReason::LockedByHost,
        };
        assert_eq!(
            locked.user_message(),
            "The tutor has disabled cameras for this class"
        );
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(
            format!("{}", ClassroomError::LessonNotFound("lesson 12".to_string())),
            "Lesson not found: lesson 12"
        );
        assert_eq!(
            format!(
                "{}",
                ClassroomError::DeviceLocked {
                    device: CaptureDevice::Camera,
                    reason: DeviceLockReason::LockedByHost,
                }
            ),
            "camera is unavailable: locked by host"
        );
    }
}
