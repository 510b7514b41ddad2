//! # Classroom Test Utilities
//!
//! Shared test utilities for the classroom session controller.
//!
//! - `mock_transport` - In-memory [`Transport`](classroom_client::transport::Transport)
//!   that records device intents and published data, and lets tests push events
//! - `clock` - Manually advanced wall clock
//! - `fixtures` - Join endpoint bodies and lesson/participant test data
//!
//! ## Usage
//!
//! ```rust,ignore
//! use classroom_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let lesson = TestLesson::random();
//!     let transport = MockTransport::new().with_metadata(r#"{"mic_locked":true,"camera_locked":false}"#);
//!     let clock = ManualClock::at(lesson.start);
//!
//!     let (handle, _notifications, _task) = ClassroomSessionActor::spawn(
//!         lesson.context(),
//!         transport.clone_arc(),
//!         clock.clone_arc(),
//!         SessionSettings::default(),
//!         CancellationToken::new(),
//!     )?;
//!
//!     transport.emit(TransportEvent::ParticipantConnected(lesson.host.clone()));
//! }
//! ```

pub mod clock;
pub mod fixtures;
pub mod mock_transport;

// Re-export commonly used items
pub use clock::ManualClock;
pub use fixtures::*;
pub use mock_transport::MockTransport;
