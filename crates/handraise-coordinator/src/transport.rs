//! Seam to the room's data channel.
//!
//! The coordinator treats the video room as a reliable, ordered-per-sender,
//! best-effort multicast channel: no persistence, no history for late
//! joiners, no delivery guarantee for participants not currently connected.
//! Production code adapts the real room SDK behind [`RoomTransport`]; tests
//! substitute an in-memory hub.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Options for a single publish.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Ask the transport to retransmit at its layer. Affects nothing for
    /// participants who are not connected when the message is sent.
    pub reliable: bool,
    /// Routing topic; receivers filter on it so unrelated data channels can
    /// share the room.
    pub topic: String,
    /// Identities to deliver to. Empty means broadcast to all current
    /// room participants.
    pub destination_identities: Vec<String>,
}

impl PublishOptions {
    /// Broadcast to every current room participant on the given topic.
    #[must_use]
    pub fn broadcast(topic: impl Into<String>, reliable: bool) -> Self {
        Self {
            reliable,
            topic: topic.into(),
            destination_identities: Vec::new(),
        }
    }
}

/// Who sent an inbound packet, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderInfo {
    /// Session-scoped participant identifier.
    pub participant_id: String,
    /// Longer-lived participant identity.
    pub identity: String,
    /// Display name.
    pub name: String,
}

/// An inbound data-channel event.
#[derive(Debug, Clone)]
pub struct DataPacket {
    /// Raw payload bytes.
    pub payload: Bytes,
    /// Sender, as attested by the transport.
    pub sender: SenderInfo,
    /// Topic the packet was published on.
    pub topic: String,
}

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The publish could not be handed to the room.
    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

/// Outbound side of the room data channel.
///
/// Inbound events arrive separately, as a stream of [`DataPacket`]s fed to
/// the coordinator by whatever adapter owns the room's event loop.
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// Publish a payload to the room.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload could not be handed to the room.
    /// The coordinator treats this as best-effort: failures are logged and
    /// counted, never retried or surfaced.
    async fn publish(&self, payload: Bytes, options: PublishOptions) -> Result<(), TransportError>;
}
