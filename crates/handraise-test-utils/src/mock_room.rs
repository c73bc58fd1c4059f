//! In-memory room standing in for the real data channel.
//!
//! `MockRoom` is a reliable broadcast hub: every publish is fanned out to
//! all attached participants' inbound channels. By default a sender does not
//! receive its own packets, matching real room semantics; builder options
//! and per-participant muting let tests exercise echoes, lost messages, and
//! late joiners.

use handraise_coordinator::config::LocalParticipant;
use handraise_coordinator::transport::{
    DataPacket, PublishOptions, RoomTransport, SenderInfo, TransportError,
};

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Inbound channel buffer per attached participant.
const INBOUND_BUFFER: usize = 64;

/// One attached participant.
struct Slot {
    sender: SenderInfo,
    tx: mpsc::Sender<DataPacket>,
    muted: bool,
}

struct RoomInner {
    echo_to_sender: bool,
    slots: Mutex<HashMap<String, Slot>>,
    publishes: AtomicU64,
}

impl RoomInner {
    async fn fan_out(&self, from: &SenderInfo, payload: Bytes, options: PublishOptions) {
        self.publishes.fetch_add(1, Ordering::SeqCst);

        let targets: Vec<mpsc::Sender<DataPacket>> = {
            let slots = self.slots.lock().expect("mock room lock poisoned");
            slots
                .values()
                .filter(|slot| !slot.muted)
                .filter(|slot| {
                    self.echo_to_sender || slot.sender.participant_id != from.participant_id
                })
                .filter(|slot| {
                    options.destination_identities.is_empty()
                        || options.destination_identities.contains(&slot.sender.identity)
                })
                .map(|slot| slot.tx.clone())
                .collect()
        };

        for tx in targets {
            let _ = tx
                .send(DataPacket {
                    payload: payload.clone(),
                    sender: from.clone(),
                    topic: options.topic.clone(),
                })
                .await;
        }
    }
}

/// Transport handed to one attached participant.
struct MockRoomTransport {
    inner: Arc<RoomInner>,
    sender: SenderInfo,
}

#[async_trait]
impl RoomTransport for MockRoomTransport {
    async fn publish(&self, payload: Bytes, options: PublishOptions) -> Result<(), TransportError> {
        self.inner.fan_out(&self.sender, payload, options).await;
        Ok(())
    }
}

/// In-memory reliable broadcast hub.
#[derive(Clone)]
pub struct MockRoom {
    inner: Arc<RoomInner>,
}

impl MockRoom {
    /// Create a room with default options (no echo to sender).
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a room builder.
    #[must_use]
    pub fn builder() -> MockRoomBuilder {
        MockRoomBuilder::default()
    }

    /// Attach a participant to the room.
    ///
    /// Returns the participant's outbound transport and the inbound channel
    /// a coordinator consumes. A participant attached after a publish never
    /// sees it; the room keeps no history.
    #[must_use]
    pub fn attach(
        &self,
        local: &LocalParticipant,
    ) -> (Arc<dyn RoomTransport>, mpsc::Receiver<DataPacket>) {
        let sender = SenderInfo {
            participant_id: local.participant_id.clone(),
            identity: local.identity.clone(),
            name: local.participant_name.clone(),
        };

        let (tx, rx) = mpsc::channel(INBOUND_BUFFER);

        self.inner
            .slots
            .lock()
            .expect("mock room lock poisoned")
            .insert(
                local.participant_id.clone(),
                Slot {
                    sender: sender.clone(),
                    tx,
                    muted: false,
                },
            );

        let transport = Arc::new(MockRoomTransport {
            inner: Arc::clone(&self.inner),
            sender,
        });

        (transport, rx)
    }

    /// Detach a participant; its inbound channel closes.
    pub fn detach(&self, participant_id: &str) {
        self.inner
            .slots
            .lock()
            .expect("mock room lock poisoned")
            .remove(participant_id);
    }

    /// Stop delivering packets to a participant (simulates loss).
    pub fn mute(&self, participant_id: &str) {
        self.set_muted(participant_id, true);
    }

    /// Resume delivering packets to a participant. Packets published while
    /// muted are gone, not replayed.
    pub fn unmute(&self, participant_id: &str) {
        self.set_muted(participant_id, false);
    }

    fn set_muted(&self, participant_id: &str, muted: bool) {
        if let Some(slot) = self
            .inner
            .slots
            .lock()
            .expect("mock room lock poisoned")
            .get_mut(participant_id)
        {
            slot.muted = muted;
        }
    }

    /// Number of publish calls the room has seen.
    #[must_use]
    pub fn publish_count(&self) -> u64 {
        self.inner.publishes.load(Ordering::SeqCst)
    }

    /// Deliver a raw packet to one participant, bypassing the publish path.
    /// Used for malformed payloads, forged senders, and echo frames.
    ///
    /// Returns false if the participant is not attached.
    pub async fn inject(&self, target_participant_id: &str, packet: DataPacket) -> bool {
        let tx = {
            let slots = self.inner.slots.lock().expect("mock room lock poisoned");
            slots.get(target_participant_id).map(|slot| slot.tx.clone())
        };

        match tx {
            Some(tx) => tx.send(packet).await.is_ok(),
            None => false,
        }
    }
}

impl Default for MockRoom {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `MockRoom` configuration.
#[derive(Debug, Default)]
pub struct MockRoomBuilder {
    echo_to_sender: bool,
}

impl MockRoomBuilder {
    /// Deliver a participant's own packets back to it. Real rooms do not do
    /// this; tests use it to exercise the echo-dedup path.
    #[must_use]
    pub fn echo_to_sender(mut self, echo: bool) -> Self {
        self.echo_to_sender = echo;
        self
    }

    /// Build the room.
    #[must_use]
    pub fn build(self) -> MockRoom {
        MockRoom {
            inner: Arc::new(RoomInner {
                echo_to_sender: self.echo_to_sender,
                slots: Mutex::new(HashMap::new()),
                publishes: AtomicU64::new(0),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestParticipant;

    #[tokio::test]
    async fn test_publish_reaches_other_participants_not_sender() {
        let room = MockRoom::new();
        let alice = TestParticipant::new("alice");
        let bob = TestParticipant::new("bob");

        let (alice_tx, mut alice_rx) = room.attach(&alice.local());
        let (_bob_tx, mut bob_rx) = room.attach(&bob.local());

        alice_tx
            .publish(
                Bytes::from_static(b"hello"),
                PublishOptions::broadcast("hand-raise", true),
            )
            .await
            .unwrap();

        let packet = bob_rx.recv().await.unwrap();
        assert_eq!(packet.payload, Bytes::from_static(b"hello"));
        assert_eq!(packet.sender.participant_id, alice.local().participant_id);
        assert_eq!(packet.topic, "hand-raise");

        // No echo by default.
        assert!(alice_rx.try_recv().is_err());
        assert_eq!(room.publish_count(), 1);
    }

    #[tokio::test]
    async fn test_echo_to_sender_option() {
        let room = MockRoom::builder().echo_to_sender(true).build();
        let alice = TestParticipant::new("alice");

        let (alice_tx, mut alice_rx) = room.attach(&alice.local());

        alice_tx
            .publish(
                Bytes::from_static(b"hello"),
                PublishOptions::broadcast("hand-raise", true),
            )
            .await
            .unwrap();

        let packet = alice_rx.recv().await.unwrap();
        assert_eq!(packet.payload, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_muted_participant_misses_packets() {
        let room = MockRoom::new();
        let alice = TestParticipant::new("alice");
        let bob = TestParticipant::new("bob");

        let (alice_tx, _alice_rx) = room.attach(&alice.local());
        let (_bob_tx, mut bob_rx) = room.attach(&bob.local());

        room.mute(&bob.local().participant_id);
        alice_tx
            .publish(
                Bytes::from_static(b"lost"),
                PublishOptions::broadcast("hand-raise", true),
            )
            .await
            .unwrap();

        room.unmute(&bob.local().participant_id);
        alice_tx
            .publish(
                Bytes::from_static(b"seen"),
                PublishOptions::broadcast("hand-raise", true),
            )
            .await
            .unwrap();

        // Only the post-unmute packet arrives; the muted one is gone.
        let packet = bob_rx.recv().await.unwrap();
        assert_eq!(packet.payload, Bytes::from_static(b"seen"));
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_inject_delivers_raw_packet() {
        let room = MockRoom::new();
        let alice = TestParticipant::new("alice");

        let (_alice_tx, mut alice_rx) = room.attach(&alice.local());

        let delivered = room
            .inject(
                &alice.local().participant_id,
                DataPacket {
                    payload: Bytes::from_static(b"{not json"),
                    sender: TestParticipant::new("mallory").sender_info(),
                    topic: "hand-raise".to_string(),
                },
            )
            .await;

        assert!(delivered);
        let packet = alice_rx.recv().await.unwrap();
        assert_eq!(packet.payload, Bytes::from_static(b"{not json"));

        // Unknown target is reported.
        let delivered = room
            .inject(
                "nobody",
                DataPacket {
                    payload: Bytes::new(),
                    sender: TestParticipant::new("mallory").sender_info(),
                    topic: "hand-raise".to_string(),
                },
            )
            .await;
        assert!(!delivered);
    }

    #[tokio::test]
    async fn test_detach_closes_inbound_channel() {
        let room = MockRoom::new();
        let alice = TestParticipant::new("alice");
        let bob = TestParticipant::new("bob");

        let (alice_tx, _alice_rx) = room.attach(&alice.local());
        let (_bob_tx, mut bob_rx) = room.attach(&bob.local());

        room.detach(&bob.local().participant_id);

        // Bob's inbound stream ends and he no longer receives publishes.
        assert!(bob_rx.recv().await.is_none());
        alice_tx
            .publish(
                Bytes::from_static(b"after detach"),
                PublishOptions::broadcast("hand-raise", true),
            )
            .await
            .unwrap();
        assert_eq!(room.publish_count(), 1);
    }

    #[tokio::test]
    async fn test_destination_identities_filter() {
        let room = MockRoom::new();
        let alice = TestParticipant::new("alice");
        let bob = TestParticipant::new("bob");
        let carol = TestParticipant::new("carol");

        let (alice_tx, _alice_rx) = room.attach(&alice.local());
        let (_bob_tx, mut bob_rx) = room.attach(&bob.local());
        let (_carol_tx, mut carol_rx) = room.attach(&carol.local());

        let mut options = PublishOptions::broadcast("hand-raise", true);
        options.destination_identities = vec![bob.local().identity.clone()];

        alice_tx
            .publish(Bytes::from_static(b"for bob"), options)
            .await
            .unwrap();

        assert!(bob_rx.recv().await.is_some());
        assert!(carol_rx.try_recv().is_err());
    }
}
