//! Remaining-time label for the in-session countdown.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Label shown once the effective end has passed.
pub const ENDED_LABEL: &str = "Class ended";

/// Time left until the effective end, at second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Minutes are not capped at 59; there is no hour component.
    Remaining { minutes: i64, seconds: i64 },
    Ended,
}

impl Countdown {
    /// Compute the countdown from `now` to `effective_end`.
    ///
    /// A partial second rounds up, so the label only reads ended once no
    /// time is left.
    #[must_use]
    pub fn between(now: DateTime<Utc>, effective_end: DateTime<Utc>) -> Self {
        let delta = effective_end - now;
        let mut remaining = delta.num_seconds();
        if delta > Duration::seconds(remaining) {
            remaining += 1;
        }
        if remaining <= 0 {
            Countdown::Ended
        } else {
            Countdown::Remaining {
                minutes: remaining / 60,
                seconds: remaining % 60,
            }
        }
    }

    #[must_use]
    pub const fn is_ended(&self) -> bool {
        matches!(self, Countdown::Ended)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Remaining { minutes, seconds } => write!(f, "{minutes}:{seconds:02}"),
            Countdown::Ended => f.write_str(ENDED_LABEL),
        }
    }
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
    fn test_format_pads_seconds_only() {
        let countdown = Countdown::between(at(10, 58, 0), at(11, 0, 0));
        assert_eq!(countdown.to_string(), "2:00");

        let countdown = Countdown::between(at(10, 0, 0), at(10, 9, 5));
        assert_eq!(countdown.to_string(), "9:05");
    }

    #[test]
    fn test_minutes_exceed_an_hour_without_hour_component() {
        let countdown = Countdown::between(at(9, 0, 0), at(10, 30, 30));
        assert_eq!(countdown.to_string(), "90:30");
    }

    #[test]
    fn test_zero_and_negative_are_ended() {
        assert!(Countdown::between(at(11, 0, 0), at(11, 0, 0)).is_ended());
        assert!(Countdown::between(at(11, 0, 1), at(11, 0, 0)).is_ended());
        assert_eq!(
            Countdown::between(at(11, 5, 0), at(11, 0, 0)).to_string(),
            ENDED_LABEL
        );
    }

    #[test]
    fn test_sub_second_remainder_rounds_up() {
        let now = at(10, 59, 59) + Duration::milliseconds(500);
        assert_eq!(Countdown::between(now, at(11, 0, 0)).to_string(), "0:01");

        let now = at(10, 58, 0) + Duration::milliseconds(1);
        assert_eq!(Countdown::between(now, at(11, 0, 0)).to_string(), "2:00");

        let past = at(11, 0, 0) + Duration::milliseconds(500);
        assert!(Countdown::between(past, at(11, 0, 0)).is_ended());
    }

    #[test]
    fn test_last_second() {
        assert_eq!(
            Countdown::between(at(10, 59, 59), at(11, 0, 0)).to_string(),
            "0:01"
        );
    }
}
