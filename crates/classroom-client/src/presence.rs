//! Host presence tracking over the live roster.
//!
//! The roster is level-triggered: every delta recomputes `host_present` from
//! the full set, so applying the same join or leave twice is harmless.

use common::types::ParticipantIdentity;
use std::collections::HashSet;

/// Remote participants currently connected, plus the host identity to look for.
#[derive(Debug, Clone)]
pub struct Roster {
    host_identity: ParticipantIdentity,
    local_is_host: bool,
    remote: HashSet<ParticipantIdentity>,
}

impl Roster {
    /// Create a roster seeded with the participants already in the room.
    ///
    /// When the local participant is the host the waiting room never applies.
    pub fn new(
        host_identity: ParticipantIdentity,
        local_is_host: bool,
        initial: impl IntoIterator<Item = ParticipantIdentity>,
    ) -> Self {
        Self {
            host_identity,
            local_is_host,
            remote: initial.into_iter().collect(),
        }
    }

    /// Record a remote participant joining.
    pub fn connected(&mut self, identity: ParticipantIdentity) {
        self.remote.insert(identity);
    }

    /// Record a remote participant leaving.
    pub fn disconnected(&mut self, identity: &ParticipantIdentity) {
        self.remote.remove(identity);
    }

    /// Whether the host is in the room.
    #[must_use]
    pub fn host_present(&self) -> bool {
        self.local_is_host || self.remote.contains(&self.host_identity)
    }

    /// Number of remote participants.
    #[must_use]
    pub fn remote_count(&self) -> usize {
        self.remote.len()
    }

    /// The host identity this roster watches for.
    #[must_use]
    pub fn host_identity(&self) -> &ParticipantIdentity {
        &self.host_identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParticipantIdentity {
        ParticipantIdentity::new(s)
    }

    #[test]
    fn test_host_absent_initially() {
        let roster = Roster::new(id("tutor"), false, vec![id("learner-2")]);
        assert!(!roster.host_present());
        assert_eq!(roster.remote_count(), 1);
    }

    #[test]
    fn test_host_joins_and_leaves() {
        let mut roster = Roster::new(id("tutor"), false, Vec::new());
        assert_eq!(roster.remote_count(), 0);

        roster.connected(id("tutor"));
        assert!(roster.host_present());

        roster.disconnected(&id("tutor"));
        assert!(!roster.host_present());
    }

    #[test]
    fn test_deltas_are_idempotent() {
        let mut roster = Roster::new(id("tutor"), false, vec![id("tutor")]);
        roster.connected(id("tutor"));
        roster.connected(id("tutor"));
        assert!(roster.host_present());
        assert_eq!(roster.remote_count(), 1);

        roster.disconnected(&id("tutor"));
        roster.disconnected(&id("tutor"));
        assert!(!roster.host_present());
    }

    #[test]
    fn test_other_participants_do_not_count_as_host() {
        let mut roster = Roster::new(id("tutor"), false, Vec::new());
        roster.connected(id("tutor-assistant"));
        roster.connected(id("Tutor"));
        assert!(!roster.host_present());
    }

    #[test]
    fn test_local_host_is_always_present() {
        let roster = Roster::new(id("tutor"), true, Vec::new());
        assert!(roster.host_present());
        assert_eq!(roster.host_identity(), &id("tutor"));
    }
}
