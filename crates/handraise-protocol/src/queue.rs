//! Raised-hands queue state machine.
//!
//! Every participant keeps an independent [`RaiseQueue`] replica, mutated
//! only through [`RaiseQueue::apply`] — the same reducer handles locally
//! originated messages and messages received off the wire, so local
//! optimistic updates and remote echoes converge by construction.

use crate::message::{HandRaiseMessage, QueueEntry};

/// What a reducer step did to the queue.
///
/// Callers use this to notify observers only on real change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueChange {
    /// A new entry was inserted in timestamp order.
    Inserted,
    /// An entry was removed.
    Removed,
    /// The queue was emptied.
    Cleared,
    /// The queue was replaced wholesale by a sync snapshot.
    Replaced,
    /// Nothing changed (duplicate raise, lower of an absent entry,
    /// clear of an already-empty queue).
    Unchanged,
}

/// Ordered sequence of raised hands.
///
/// Invariants:
/// - at most one entry per `participant_id`,
/// - entries are sorted ascending by `timestamp` after every insertion
///   (stable for ties), regardless of network arrival order.
///
/// A `hand-sync` snapshot replaces the queue wholesale and keeps the
/// snapshot's own order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaiseQueue {
    entries: Vec<QueueEntry>,
}

impl RaiseQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries, first-raised first.
    #[must_use]
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Whether the given participant has a raised hand.
    #[must_use]
    pub fn contains(&self, participant_id: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.participant_id == participant_id)
    }

    /// Zero-based position of the given participant in the queue.
    #[must_use]
    pub fn position(&self, participant_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.participant_id == participant_id)
    }

    /// Number of raised hands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no hands are raised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply a protocol message to the queue.
    ///
    /// `sender_identity` is the longer-lived identity of whoever produced
    /// the message (the transport's sender for remote messages, the local
    /// participant for optimistic local updates); it is recorded on newly
    /// inserted entries for display/audit.
    pub fn apply(&mut self, message: &HandRaiseMessage, sender_identity: &str) -> QueueChange {
        match message {
            HandRaiseMessage::Raise {
                participant_id,
                participant_name,
                timestamp,
            } => {
                // Dedup: an echo of our own optimistic insert, or a
                // duplicate redelivery, must not create a second entry.
                if self.contains(participant_id) {
                    return QueueChange::Unchanged;
                }

                self.entries.push(QueueEntry {
                    participant_id: participant_id.clone(),
                    participant_name: participant_name.clone(),
                    timestamp: *timestamp,
                    identity: sender_identity.to_string(),
                });
                self.entries.sort_by_key(|e| e.timestamp);
                QueueChange::Inserted
            }

            HandRaiseMessage::Lower { participant_id, .. } => {
                let before = self.entries.len();
                self.entries.retain(|e| e.participant_id != *participant_id);
                if self.entries.len() == before {
                    QueueChange::Unchanged
                } else {
                    QueueChange::Removed
                }
            }

            HandRaiseMessage::Clear { .. } => {
                // Any sender may clear; the protocol carries no role claim.
                if self.entries.is_empty() {
                    QueueChange::Unchanged
                } else {
                    self.entries.clear();
                    QueueChange::Cleared
                }
            }

            HandRaiseMessage::Sync { queue, .. } => {
                self.entries = queue.clone();
                QueueChange::Replaced
            }
        }
    }
}
