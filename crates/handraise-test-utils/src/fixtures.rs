//! Pre-configured test participants and queue entries.

use handraise_coordinator::config::LocalParticipant;
use handraise_coordinator::transport::SenderInfo;
use handraise_protocol::message::QueueEntry;
use uuid::Uuid;

/// A participant fixture with deterministic ids derived from a short name.
///
/// # Example
///
/// ```rust,ignore
/// let alice = TestParticipant::new("alice");
/// assert_eq!(alice.local().participant_id, "alice-sid");
/// ```
#[derive(Debug, Clone)]
pub struct TestParticipant {
    local: LocalParticipant,
}

impl TestParticipant {
    /// Create a participant with deterministic ids (`<name>-sid`,
    /// `<name>-identity`).
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            local: LocalParticipant::new(
                format!("{name}-sid"),
                name.to_string(),
                format!("{name}-identity"),
            ),
        }
    }

    /// Create a participant with a random session id, for tests that model
    /// reconnects (same identity, fresh `participant_id`).
    #[must_use]
    pub fn reconnected(name: &str) -> Self {
        Self {
            local: LocalParticipant::new(
                format!("{name}-sid-{}", Uuid::new_v4()),
                name.to_string(),
                format!("{name}-identity"),
            ),
        }
    }

    /// The `LocalParticipant` descriptor for spawning a coordinator.
    #[must_use]
    pub fn local(&self) -> LocalParticipant {
        self.local.clone()
    }

    /// Sender info as the transport would report it.
    #[must_use]
    pub fn sender_info(&self) -> SenderInfo {
        SenderInfo {
            participant_id: self.local.participant_id.clone(),
            identity: self.local.identity.clone(),
            name: self.local.participant_name.clone(),
        }
    }

    /// A queue entry for this participant at the given raise time.
    #[must_use]
    pub fn entry(&self, timestamp: i64) -> QueueEntry {
        QueueEntry {
            participant_id: self.local.participant_id.clone(),
            participant_name: self.local.participant_name.clone(),
            timestamp,
            identity: self.local.identity.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_ids() {
        let alice = TestParticipant::new("alice");
        assert_eq!(alice.local().participant_id, "alice-sid");
        assert_eq!(alice.local().participant_name, "alice");
        assert_eq!(alice.local().identity, "alice-identity");
    }

    #[test]
    fn test_reconnected_keeps_identity() {
        let first = TestParticipant::new("alice");
        let second = TestParticipant::reconnected("alice");

        assert_eq!(first.local().identity, second.local().identity);
        assert_ne!(first.local().participant_id, second.local().participant_id);
    }

    #[test]
    fn test_entry_matches_participant() {
        let alice = TestParticipant::new("alice");
        let entry = alice.entry(42);

        assert_eq!(entry.participant_id, "alice-sid");
        assert_eq!(entry.timestamp, 42);
        assert_eq!(entry.identity, "alice-identity");
    }
}
