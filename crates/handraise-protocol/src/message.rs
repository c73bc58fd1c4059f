//! Hand-raise message types and wire representation.

use serde::{Deserialize, Serialize};

/// One raised hand in the queue.
///
/// The queue holds at most one entry per `participant_id` and is ordered
/// ascending by `timestamp` (first raised, first served).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// Session-scoped participant identifier. Stable for the lifetime of the
    /// participant's connection, not across reconnects.
    pub participant_id: String,
    /// Display name at the time the hand was raised (not live-updated).
    pub participant_name: String,
    /// Raise time in milliseconds since epoch, assigned by the producer.
    pub timestamp: i64,
    /// Longer-lived participant identity, for display/audit only.
    /// Absent on the wire decodes to an empty string.
    #[serde(default)]
    pub identity: String,
}

/// A hand-raise protocol message.
///
/// Wire format is a UTF-8 JSON object tagged by a `type` field holding one of
/// `hand-raise`, `hand-lower`, `hand-clear`, `hand-sync`. Field names are
/// camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HandRaiseMessage {
    /// Sender wants to join the queue.
    #[serde(rename = "hand-raise", rename_all = "camelCase")]
    Raise {
        participant_id: String,
        participant_name: String,
        /// Raise time in milliseconds since epoch.
        timestamp: i64,
    },

    /// Remove a participant from the queue (self, or another participant
    /// when sent by a moderator surface).
    #[serde(rename = "hand-lower", rename_all = "camelCase")]
    Lower {
        participant_id: String,
        participant_name: String,
    },

    /// Empty the entire queue. The protocol carries no sender role claim;
    /// restricting this to moderators is the calling surface's job.
    #[serde(rename = "hand-clear", rename_all = "camelCase")]
    Clear {
        participant_id: String,
        participant_name: String,
    },

    /// Replace the local queue wholesale with the carried snapshot.
    /// Used to reconcile late joiners; last-applied sync wins.
    #[serde(rename = "hand-sync", rename_all = "camelCase")]
    Sync {
        participant_id: String,
        participant_name: String,
        /// Full queue snapshot. Absent on the wire decodes to empty.
        #[serde(default)]
        queue: Vec<QueueEntry>,
    },
}

impl HandRaiseMessage {
    /// The sender's participant ID.
    #[must_use]
    pub fn participant_id(&self) -> &str {
        match self {
            HandRaiseMessage::Raise { participant_id, .. }
            | HandRaiseMessage::Lower { participant_id, .. }
            | HandRaiseMessage::Clear { participant_id, .. }
            | HandRaiseMessage::Sync { participant_id, .. } => participant_id,
        }
    }

    /// The sender's display name.
    #[must_use]
    pub fn participant_name(&self) -> &str {
        match self {
            HandRaiseMessage::Raise {
                participant_name, ..
            }
            | HandRaiseMessage::Lower {
                participant_name, ..
            }
            | HandRaiseMessage::Clear {
                participant_name, ..
            }
            | HandRaiseMessage::Sync {
                participant_name, ..
            } => participant_name,
        }
    }

    /// Bounded label for the message kind (for logs and metrics).
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            HandRaiseMessage::Raise { .. } => "hand-raise",
            HandRaiseMessage::Lower { .. } => "hand-lower",
            HandRaiseMessage::Clear { .. } => "hand-clear",
            HandRaiseMessage::Sync { .. } => "hand-sync",
        }
    }
}
