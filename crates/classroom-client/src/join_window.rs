//! Join window policy.
//!
//! A learner may request a connection credential from ten minutes before the
//! scheduled start until the effective end of the class, inclusive on both
//! ends. Nothing here performs I/O; "now" is always passed in.

use crate::errors::ClassroomError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use std::fmt;

/// Default lead time before the scheduled start at which joining opens.
pub const DEFAULT_JOIN_LEAD: Duration = Duration::minutes(10);

/// Where "now" falls relative to a session's join window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinPhase {
    /// Before `start - lead`.
    TooEarly,
    /// Inside the pre-join lead time, before the scheduled start.
    Joinable,
    /// Between the scheduled start and the effective end.
    Live,
    /// After the effective end.
    Ended,
}

impl JoinPhase {
    /// Whether a join request may be attempted in this phase.
    #[must_use]
    pub const fn can_join(&self) -> bool {
        matches!(self, JoinPhase::Joinable | JoinPhase::Live)
    }

    /// Returns the phase as a string for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            JoinPhase::TooEarly => "too_early",
            JoinPhase::Joinable => "joinable",
            JoinPhase::Live => "live",
            JoinPhase::Ended => "ended",
        }
    }
}

impl fmt::Display for JoinPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `now` with the default ten minute lead.
#[must_use]
pub fn classify(
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    effective_end: DateTime<Utc>,
) -> JoinPhase {
    JoinWindowPolicy::default().classify(now, start, effective_end)
}

/// Join window policy with a configurable lead time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinWindowPolicy {
    lead: Duration,
}

impl Default for JoinWindowPolicy {
    fn default() -> Self {
        Self {
            lead: DEFAULT_JOIN_LEAD,
        }
    }
}

impl JoinWindowPolicy {
    /// Create a policy that opens `lead` before the scheduled start.
    #[must_use]
    pub const fn new(lead: Duration) -> Self {
        Self { lead }
    }

    /// Lead time before the scheduled start.
    #[must_use]
    pub const fn lead(&self) -> Duration {
        self.lead
    }

    /// Instant at which joining opens for a session starting at `start`.
    ///
    /// Saturates at the earliest representable instant.
    #[must_use]
    pub fn opens_at(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start
            .checked_sub_signed(self.lead)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Classify `now` against `[start - lead, effective_end]`.
    ///
    /// The window ends at `effective_end` even if the server still considers
    /// the class in progress.
    #[must_use]
    pub fn classify(
        &self,
        now: DateTime<Utc>,
        start: DateTime<Utc>,
        effective_end: DateTime<Utc>,
    ) -> JoinPhase {
        if now > effective_end {
            JoinPhase::Ended
        } else if now < self.opens_at(start) {
            JoinPhase::TooEarly
        } else if now < start {
            JoinPhase::Joinable
        } else {
            JoinPhase::Live
        }
    }
}

/// Scheduled window of one class occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl SessionWindow {
    /// Create a window, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ClassroomError> {
        if end <= start {
            return Err(ClassroomError::InvalidSchedule(format!(
                "end {end} is not after start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a window from the backend's separate `date`, `start_time` and
    /// `end_time` strings, interpreted at `offset`.
    ///
    /// The date and each time are parsed separately and joined as typed
    /// values; the strings are never concatenated.
    pub fn from_schedule(
        date: &str,
        start_time: &str,
        end_time: &str,
        offset: FixedOffset,
    ) -> Result<Self, ClassroomError> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| ClassroomError::InvalidSchedule(format!("date {date:?}: {e}")))?;
        let start = combine(date, parse_time(start_time)?, offset)?;
        let end = combine(date, parse_time(end_time)?, offset)?;
        Self::new(start, end)
    }

    /// Scheduled start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Scheduled end (before any extension).
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, ClassroomError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|e| ClassroomError::InvalidSchedule(format!("time {value:?}: {e}")))
}

fn combine(
    date: NaiveDate,
    time: NaiveTime,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, ClassroomError> {
    date.and_time(time)
        .and_local_timezone(offset)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            ClassroomError::InvalidSchedule(format!("{date} {time} is not a valid local time"))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, hour, minute, second)
            .unwrap()
    }

    #[test]
    fn test_classify_too_early() {
        // 09:49 against a 10:00 start
        assert_eq!(
            classify(at(9, 49, 0), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::TooEarly
        );
        assert_eq!(
            classify(at(9, 49, 59), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::TooEarly
        );
    }

    #[test]
    fn test_classify_window_is_inclusive_at_both_ends() {
        assert_eq!(
            classify(at(9, 50, 0), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::Joinable
        );
        assert_eq!(
            classify(at(11, 0, 0), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::Live
        );
        assert_eq!(
            classify(at(11, 0, 1), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::Ended
        );
    }

    #[test]
    fn test_classify_joinable_then_live() {
        assert_eq!(
            classify(at(9, 51, 0), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::Joinable
        );
        assert_eq!(
            classify(at(10, 0, 0), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::Live
        );
        assert_eq!(
            classify(at(10, 30, 0), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::Live
        );
    }

    #[test]
    fn test_classify_uses_effective_end_not_scheduled_end() {
        // Extended to 11:15; 11:10 is still live, 11:16 has ended.
        assert_eq!(
            classify(at(11, 10, 0), at(10, 0, 0), at(11, 15, 0)),
            JoinPhase::Live
        );
        assert_eq!(
            classify(at(11, 16, 0), at(10, 0, 0), at(11, 15, 0)),
            JoinPhase::Ended
        );
    }

    #[test]
    fn test_classify_sweep_over_a_day() {
        let start = at(10, 0, 0);
        let end = at(11, 0, 0);
        let opens = start - DEFAULT_JOIN_LEAD;
        let mut now = at(0, 0, 0);
        while now < at(23, 59, 0) {
            let phase = classify(now, start, end);
            if now < opens {
                assert_eq!(phase, JoinPhase::TooEarly, "at {now}");
            } else if now <= end {
                assert!(phase.can_join(), "at {now}");
            } else {
                assert_eq!(phase, JoinPhase::Ended, "at {now}");
            }
            now += Duration::seconds(37);
        }
    }

    #[test]
    fn test_custom_lead() {
        let policy = JoinWindowPolicy::new(Duration::minutes(2));
        assert_eq!(
            policy.classify(at(9, 57, 0), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::TooEarly
        );
        assert_eq!(
            policy.classify(at(9, 58, 0), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::Joinable
        );
        assert_eq!(policy.opens_at(at(10, 0, 0)), at(9, 58, 0));
    }

    #[test]
    fn test_huge_lead_saturates_instead_of_overflowing() {
        let policy = JoinWindowPolicy::new(Duration::seconds(9_000_000_000_000));
        assert_eq!(policy.opens_at(at(10, 0, 0)), DateTime::<Utc>::MIN_UTC);
        assert_eq!(
            policy.classify(at(8, 0, 0), at(10, 0, 0), at(11, 0, 0)),
            JoinPhase::Joinable
        );
    }

    #[test]
    fn test_from_schedule_utc() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let window = SessionWindow::from_schedule("2026-10-19", "10:00", "11:00:00", utc).unwrap();
        assert_eq!(window.start(), at(10, 0, 0));
        assert_eq!(window.end(), at(11, 0, 0));
    }

    #[test]
    fn test_from_schedule_applies_offset() {
        // 12:00 at UTC+02:00 is 10:00 UTC
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let window = SessionWindow::from_schedule("2026-10-19", "12:00", "13:00", offset).unwrap();
        assert_eq!(window.start(), at(10, 0, 0));
        assert_eq!(window.end(), at(11, 0, 0));
    }

    #[test]
    fn test_from_schedule_rejects_malformed_input() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(matches!(
            SessionWindow::from_schedule("19/10/2026", "10:00", "11:00", utc),
            Err(ClassroomError::InvalidSchedule(_))
        ));
        assert!(matches!(
            SessionWindow::from_schedule("2026-10-19", "10am", "11:00", utc),
            Err(ClassroomError::InvalidSchedule(_))
        ));
        // Concatenated date-time in the time field is not accepted.
        assert!(matches!(
            SessionWindow::from_schedule("2026-10-19", "2026-10-19T10:00", "11:00", utc),
            Err(ClassroomError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn test_window_requires_start_before_end() {
        assert!(SessionWindow::new(at(11, 0, 0), at(10, 0, 0)).is_err());
        assert!(SessionWindow::new(at(10, 0, 0), at(10, 0, 0)).is_err());
        assert!(SessionWindow::new(at(10, 0, 0), at(10, 0, 1)).is_ok());
    }
}
