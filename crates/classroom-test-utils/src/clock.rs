//! Manually advanced wall clock.

use chrono::{DateTime, Duration, Utc};
use common::clock::Clock;
use std::sync::{Arc, Mutex};

/// Clock that only moves when a test moves it.
///
/// Clones share the same instant, so a test can keep one copy and hand
/// another to the code under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock stopped at `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    /// Shared clock for APIs that take `Arc<dyn Clock>`.
    pub fn clone_arc(&self) -> Arc<dyn Clock> {
        Arc::new(self.clone())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clones_share_time() {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();
        let clock = ManualClock::at(start);
        let shared = clock.clone_arc();

        clock.advance(Duration::minutes(5));
        assert_eq!(shared.now(), start + Duration::minutes(5));

        clock.set(start);
        assert_eq!(shared.now(), start);
    }
}
