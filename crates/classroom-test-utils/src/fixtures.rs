//! Pre-configured test data.
//!
//! - [`TestLesson`]: a lesson window with host and learner identities
//! - Join endpoint bodies ([`grant_json`], [`too_early_json`])
//! - Control metadata and data-channel payloads

use chrono::{DateTime, Duration, TimeZone, Utc};
use classroom_client::actors::SessionContext;
use common::types::{LessonId, ParticipantIdentity};
use uuid::Uuid;

/// Test lesson fixture.
#[derive(Debug, Clone)]
pub struct TestLesson {
    pub id: LessonId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub host: ParticipantIdentity,
    pub learner: ParticipantIdentity,
}

impl TestLesson {
    /// 10:00-11:00 UTC on 2026-10-19, with the given ID.
    pub fn new(id: u64) -> Self {
        Self {
            id: LessonId(id),
            start: Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 10, 19, 11, 0, 0).unwrap(),
            host: ParticipantIdentity::new("tutor-1"),
            learner: ParticipantIdentity::new("learner-1"),
        }
    }

    /// Same window, random lesson ID and identities.
    pub fn random() -> Self {
        let (high, _) = Uuid::new_v4().as_u64_pair();
        Self {
            host: ParticipantIdentity::new(format!("tutor-{}", Uuid::new_v4())),
            learner: ParticipantIdentity::new(format!("learner-{}", Uuid::new_v4())),
            ..Self::new(high >> 1)
        }
    }

    /// Instant `minutes` after the scheduled start (negative for before).
    pub fn at(&self, minutes: i64) -> DateTime<Utc> {
        self.start + Duration::minutes(minutes)
    }

    /// Session context for the learner, with the start known.
    pub fn context(&self) -> SessionContext {
        SessionContext {
            lesson_id: self.id,
            scheduled_start: Some(self.start),
            host_identity: self.host.clone(),
            is_host: false,
            effective_end: self.end,
            resources: Vec::new(),
        }
    }

    /// Session context for the host.
    pub fn host_context(&self) -> SessionContext {
        SessionContext {
            is_host: true,
            ..self.context()
        }
    }
}

/// Body of a successful join response.
pub fn grant_json(lesson: &TestLesson, is_host: bool) -> serde_json::Value {
    serde_json::json!({
        "token": format!("rtc-token-{}", lesson.id),
        "url": "wss://rtc.example.test",
        "is_host": is_host,
        "host_identity": lesson.host.as_str(),
        "effective_end_time": lesson.end.to_rfc3339(),
        "resources": [
            {"id": 1, "title": "Slides", "file": "https://files.example.test/slides.pdf"},
            {"id": 2, "title": "Homework", "file": "https://files.example.test/homework.pdf"}
        ]
    })
}

/// Body of a 403 "too early" join response.
pub fn too_early_json(lesson: &TestLesson) -> serde_json::Value {
    serde_json::json!({
        "error": "too_early",
        "message": "You can join 10 minutes before the class starts",
        "open_at": (lesson.start - Duration::minutes(10)).to_rfc3339()
    })
}

/// Room metadata document.
pub fn control_metadata(mic_locked: bool, camera_locked: bool) -> String {
    serde_json::json!({
        "mic_locked": mic_locked,
        "camera_locked": camera_locked
    })
    .to_string()
}

/// `TIME_EXTENDED` data-channel payload.
pub fn time_extended_payload(new_end_time: DateTime<Utc>, minutes: u32) -> Vec<u8> {
    serde_json::json!({
        "type": "TIME_EXTENDED",
        "new_end_time": new_end_time.to_rfc3339(),
        "minutes": minutes
    })
    .to_string()
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_lessons_differ() {
        let a = TestLesson::random();
        let b = TestLesson::random();
        assert_ne!(a.host, b.host);
        assert_eq!(a.end - a.start, Duration::hours(1));
    }

    #[test]
    fn test_control_metadata_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&control_metadata(true, false)).unwrap();
        assert_eq!(value["mic_locked"], true);
        assert_eq!(value["camera_locked"], false);
    }
}
