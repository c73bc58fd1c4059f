//! Mailbox message types for the coordinator actor.
//!
//! All communication with the actor uses strongly-typed message passing via
//! `tokio::sync::mpsc`; request-reply uses `tokio::sync::oneshot`.

use handraise_protocol::message::QueueEntry;
use tokio::sync::oneshot;

/// Messages sent to the coordinator actor.
#[derive(Debug)]
pub enum CoordinatorMessage {
    /// Raise the local participant's hand. No-op if already raised.
    RaiseHand {
        /// Response channel, completed once the local state is updated.
        respond_to: oneshot::Sender<()>,
    },

    /// Lower a hand. `target` defaults to the local participant.
    LowerHand {
        target: Option<String>,
        /// Response channel, completed once the local state is updated.
        respond_to: oneshot::Sender<()>,
    },

    /// Empty the entire queue for every participant.
    ClearAllHands {
        /// Response channel, completed once the local state is updated.
        respond_to: oneshot::Sender<()>,
    },

    /// Push the full local queue to peers. No-op when the queue is empty.
    SyncQueue {
        /// Response channel, completed once the broadcast is attempted.
        respond_to: oneshot::Sender<()>,
    },

    /// Get the current queue snapshot.
    GetSnapshot {
        /// Response channel for the snapshot.
        respond_to: oneshot::Sender<QueueSnapshot>,
    },
}

/// Point-in-time view of the coordinator's replica.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    /// Raised hands, first-raised first.
    pub entries: Vec<QueueEntry>,
    /// Whether the local participant is in the queue.
    pub is_hand_raised: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_default_is_empty() {
        let snapshot = QueueSnapshot::default();
        assert!(snapshot.entries.is_empty());
        assert!(!snapshot.is_hand_raised);
    }

    #[test]
    fn test_snapshot_clone() {
        let snapshot = QueueSnapshot {
            entries: vec![QueueEntry {
                participant_id: "p-1".to_string(),
                participant_name: "Alice".to_string(),
                timestamp: 1,
                identity: "alice".to_string(),
            }],
            is_hand_raised: true,
        };
        let cloned = snapshot.clone();
        assert_eq!(snapshot, cloned);
    }
}
