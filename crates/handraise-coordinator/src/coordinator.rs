//! `HandRaiseCoordinator` - per-participant actor that owns the queue replica.
//!
//! Each coordinator:
//! - Owns one participant's copy of the raised-hands queue
//! - Broadcasts locally initiated mutations over the room transport
//! - Applies inbound protocol messages through the pure reducer
//! - Publishes a watchable snapshot for UI surfaces
//!
//! Local mutations are optimistic: the outbound message is applied to the
//! local replica immediately, without waiting for an echo or any
//! acknowledgement. A dropped broadcast leaves peers stale until the next
//! `hand-sync`; it is never an error.

use crate::config::{CoordinatorConfig, LocalParticipant};
use crate::errors::CoordinatorError;
use crate::messages::{CoordinatorMessage, QueueSnapshot};
use crate::metrics::CoordinatorMetrics;
use crate::transport::{DataPacket, PublishOptions, RoomTransport};

use handraise_protocol::codec::{decode_message, encode_message};
use handraise_protocol::message::{HandRaiseMessage, QueueEntry};
use handraise_protocol::queue::{QueueChange, RaiseQueue};

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Handle to a `HandRaiseCoordinator`.
#[derive(Clone)]
pub struct HandRaiseCoordinatorHandle {
    sender: mpsc::Sender<CoordinatorMessage>,
    snapshot_rx: watch::Receiver<QueueSnapshot>,
    cancel_token: CancellationToken,
    participant_id: String,
}

impl HandRaiseCoordinatorHandle {
    /// The local participant's ID.
    #[must_use]
    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    /// Raise the local participant's hand.
    ///
    /// Idempotent: if the hand is already raised this neither re-broadcasts
    /// nor duplicates the entry.
    pub async fn raise_hand(&self) -> Result<(), CoordinatorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(CoordinatorMessage::RaiseHand { respond_to: tx })
            .await
            .map_err(|e| CoordinatorError::Internal(format!("channel send failed: {e}")))?;

        rx.await
            .map_err(|e| CoordinatorError::Internal(format!("response receive failed: {e}")))
    }

    /// Lower a hand. `target` defaults to the local participant; a moderator
    /// surface passes another participant's ID to lower them.
    pub async fn lower_hand(&self, target: Option<String>) -> Result<(), CoordinatorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(CoordinatorMessage::LowerHand {
                target,
                respond_to: tx,
            })
            .await
            .map_err(|e| CoordinatorError::Internal(format!("channel send failed: {e}")))?;

        rx.await
            .map_err(|e| CoordinatorError::Internal(format!("response receive failed: {e}")))
    }

    /// Empty the queue for every participant in the room.
    ///
    /// The protocol does not check that the caller is a moderator; the
    /// calling surface is responsible for gating this action.
    pub async fn clear_all_hands(&self) -> Result<(), CoordinatorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(CoordinatorMessage::ClearAllHands { respond_to: tx })
            .await
            .map_err(|e| CoordinatorError::Internal(format!("channel send failed: {e}")))?;

        rx.await
            .map_err(|e| CoordinatorError::Internal(format!("response receive failed: {e}")))
    }

    /// Push the full local queue to peers, reconciling late joiners.
    ///
    /// No-op when the local queue is empty. Concurrent syncs from different
    /// senders race; the last one applied wins at each receiver.
    pub async fn sync_queue(&self) -> Result<(), CoordinatorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(CoordinatorMessage::SyncQueue { respond_to: tx })
            .await
            .map_err(|e| CoordinatorError::Internal(format!("channel send failed: {e}")))?;

        rx.await
            .map_err(|e| CoordinatorError::Internal(format!("response receive failed: {e}")))
    }

    /// Get the current queue snapshot.
    pub async fn snapshot(&self) -> Result<QueueSnapshot, CoordinatorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(CoordinatorMessage::GetSnapshot { respond_to: tx })
            .await
            .map_err(|e| CoordinatorError::Internal(format!("channel send failed: {e}")))?;

        rx.await
            .map_err(|e| CoordinatorError::Internal(format!("response receive failed: {e}")))
    }

    /// Whether the local participant's hand is currently raised.
    pub async fn is_hand_raised(&self) -> Result<bool, CoordinatorError> {
        Ok(self.snapshot().await?.is_hand_raised)
    }

    /// Current raised hands, first-raised first.
    pub async fn queue(&self) -> Result<Vec<QueueEntry>, CoordinatorError> {
        Ok(self.snapshot().await?.entries)
    }

    /// Subscribe to snapshot updates. The receiver is updated after every
    /// state change; UI surfaces render from it.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<QueueSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Cancel the coordinator actor.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Check if the actor is cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// The `HandRaiseCoordinator` implementation.
pub struct HandRaiseCoordinator {
    /// The participant this coordinator speaks for.
    local: LocalParticipant,
    /// Coordinator configuration.
    config: CoordinatorConfig,
    /// Outbound side of the room data channel.
    transport: Arc<dyn RoomTransport>,
    /// Inbound data-channel events from the room adapter.
    inbound: mpsc::Receiver<DataPacket>,
    /// Whether the inbound stream has ended (room adapter gone).
    inbound_closed: bool,
    /// Mailbox receiver.
    receiver: mpsc::Receiver<CoordinatorMessage>,
    /// Cancellation token.
    cancel_token: CancellationToken,
    /// The local queue replica.
    queue: RaiseQueue,
    /// Snapshot publisher for UI surfaces.
    snapshot_tx: watch::Sender<QueueSnapshot>,
    /// Shared counters.
    metrics: Arc<CoordinatorMetrics>,
}

impl HandRaiseCoordinator {
    /// Spawn a new coordinator actor.
    ///
    /// Returns a handle and the task join handle.
    ///
    /// # Arguments
    ///
    /// * `local` - The participant this coordinator speaks for
    /// * `config` - Topic, reliability flag, mailbox sizing
    /// * `transport` - Outbound side of the room data channel
    /// * `inbound` - Inbound data-channel events from the room adapter
    /// * `cancel_token` - Cancellation token (typically a child of the
    ///   session's token)
    /// * `metrics` - Shared counters
    pub fn spawn(
        local: LocalParticipant,
        config: CoordinatorConfig,
        transport: Arc<dyn RoomTransport>,
        inbound: mpsc::Receiver<DataPacket>,
        cancel_token: CancellationToken,
        metrics: Arc<CoordinatorMetrics>,
    ) -> (HandRaiseCoordinatorHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(config.mailbox_buffer);
        let (snapshot_tx, snapshot_rx) = watch::channel(QueueSnapshot::default());

        let participant_id = local.participant_id.clone();

        let actor = Self {
            local,
            config,
            transport,
            inbound,
            inbound_closed: false,
            receiver,
            cancel_token: cancel_token.clone(),
            queue: RaiseQueue::new(),
            snapshot_tx,
            metrics,
        };

        let task_handle = tokio::spawn(actor.run());

        let handle = HandRaiseCoordinatorHandle {
            sender,
            snapshot_rx,
            cancel_token,
            participant_id,
        };

        (handle, task_handle)
    }

    /// Run the actor message loop.
    #[instrument(skip_all, name = "handraise.coordinator", fields(participant_id = %self.local.participant_id))]
    async fn run(mut self) {
        info!(
            target: "handraise.coordinator",
            participant_id = %self.local.participant_id,
            topic = %self.config.topic,
            "HandRaiseCoordinator started"
        );

        loop {
            tokio::select! {
                // Handle cancellation
                () = self.cancel_token.cancelled() => {
                    info!(
                        target: "handraise.coordinator",
                        participant_id = %self.local.participant_id,
                        "HandRaiseCoordinator received cancellation signal"
                    );
                    break;
                }

                // Handle mailbox messages
                msg = self.receiver.recv() => {
                    match msg {
                        Some(message) => self.handle_message(message).await,
                        None => {
                            info!(
                                target: "handraise.coordinator",
                                participant_id = %self.local.participant_id,
                                "HandRaiseCoordinator channel closed, exiting"
                            );
                            break;
                        }
                    }
                }

                // Handle inbound data-channel events
                packet = self.inbound.recv(), if !self.inbound_closed => {
                    match packet {
                        Some(packet) => self.handle_packet(packet),
                        None => {
                            // Room adapter is gone. Keep serving local reads
                            // so the UI can still render the last view.
                            warn!(
                                target: "handraise.coordinator",
                                participant_id = %self.local.participant_id,
                                "Inbound data stream ended, replica is frozen"
                            );
                            self.inbound_closed = true;
                        }
                    }
                }
            }
        }

        info!(
            target: "handraise.coordinator",
            participant_id = %self.local.participant_id,
            raised_hands = self.queue.len(),
            "HandRaiseCoordinator stopped"
        );
    }

    /// Handle a single mailbox message.
    async fn handle_message(&mut self, message: CoordinatorMessage) {
        match message {
            CoordinatorMessage::RaiseHand { respond_to } => {
                self.handle_raise().await;
                let _ = respond_to.send(());
            }

            CoordinatorMessage::LowerHand { target, respond_to } => {
                self.handle_lower(target).await;
                let _ = respond_to.send(());
            }

            CoordinatorMessage::ClearAllHands { respond_to } => {
                self.handle_clear().await;
                let _ = respond_to.send(());
            }

            CoordinatorMessage::SyncQueue { respond_to } => {
                self.handle_sync().await;
                let _ = respond_to.send(());
            }

            CoordinatorMessage::GetSnapshot { respond_to } => {
                let _ = respond_to.send(self.snapshot());
            }
        }
    }

    /// Raise the local hand: broadcast, then optimistically insert.
    async fn handle_raise(&mut self) {
        if self.queue.contains(&self.local.participant_id) {
            debug!(
                target: "handraise.coordinator",
                participant_id = %self.local.participant_id,
                "Hand already raised, ignoring"
            );
            return;
        }

        let message = HandRaiseMessage::Raise {
            participant_id: self.local.participant_id.clone(),
            participant_name: self.local.participant_name.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        self.broadcast(&message).await;
        self.apply_local(&message);
    }

    /// Lower a hand, defaulting to the local participant. The removal is
    /// applied locally right away, even when the target is someone else,
    /// so a moderator's view reflects the action before any echo.
    async fn handle_lower(&mut self, target: Option<String>) {
        let target_id = target.unwrap_or_else(|| self.local.participant_id.clone());

        // The name on a lower message is cosmetic; receivers match on ID.
        let target_name = if target_id == self.local.participant_id {
            self.local.participant_name.clone()
        } else {
            self.queue
                .entries()
                .iter()
                .find(|e| e.participant_id == target_id)
                .map_or_else(|| target_id.clone(), |e| e.participant_name.clone())
        };

        let message = HandRaiseMessage::Lower {
            participant_id: target_id,
            participant_name: target_name,
        };

        self.broadcast(&message).await;
        self.apply_local(&message);
    }

    /// Empty the queue everywhere.
    async fn handle_clear(&mut self) {
        let message = HandRaiseMessage::Clear {
            participant_id: self.local.participant_id.clone(),
            participant_name: self.local.participant_name.clone(),
        };

        self.broadcast(&message).await;
        self.apply_local(&message);
    }

    /// Push the full local queue to peers.
    async fn handle_sync(&mut self) {
        if self.queue.is_empty() {
            debug!(
                target: "handraise.coordinator",
                participant_id = %self.local.participant_id,
                "Queue empty, skipping sync"
            );
            return;
        }

        let message = HandRaiseMessage::Sync {
            participant_id: self.local.participant_id.clone(),
            participant_name: self.local.participant_name.clone(),
            queue: self.queue.entries().to_vec(),
        };

        // Sync carries our state; it does not change it.
        self.broadcast(&message).await;
    }

    /// Handle one inbound data-channel event.
    fn handle_packet(&mut self, packet: DataPacket) {
        if packet.topic != self.config.topic {
            self.metrics.record_foreign_topic();
            return;
        }

        let message = match decode_message(&packet.payload) {
            Ok(message) => message,
            Err(error) => {
                warn!(
                    target: "handraise.coordinator",
                    participant_id = %self.local.participant_id,
                    sender = %packet.sender.identity,
                    error = %error,
                    payload_len = packet.payload.len(),
                    "Discarding malformed hand-raise payload"
                );
                self.metrics.record_decode_failure();
                return;
            }
        };

        debug!(
            target: "handraise.coordinator",
            participant_id = %self.local.participant_id,
            kind = message.kind_label(),
            sender = %packet.sender.identity,
            "Applying inbound message"
        );

        let change = self.queue.apply(&message, &packet.sender.identity);
        self.metrics.record_message_applied();

        if change != QueueChange::Unchanged {
            self.publish_snapshot();
        }
    }

    /// Apply a locally originated message through the same reducer used for
    /// inbound traffic, so optimistic updates and echoes converge.
    fn apply_local(&mut self, message: &HandRaiseMessage) {
        let change = self.queue.apply(message, &self.local.identity);
        if change != QueueChange::Unchanged {
            self.publish_snapshot();
        }
    }

    /// Best-effort broadcast: failures are logged and counted, never
    /// retried or surfaced.
    async fn broadcast(&self, message: &HandRaiseMessage) {
        let payload = match encode_message(message) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(
                    target: "handraise.coordinator",
                    participant_id = %self.local.participant_id,
                    kind = message.kind_label(),
                    error = %error,
                    "Failed to encode outbound message"
                );
                self.metrics.record_publish_failure();
                return;
            }
        };

        let options = PublishOptions::broadcast(self.config.topic.clone(), self.config.reliable);

        match self.transport.publish(payload, options).await {
            Ok(()) => self.metrics.record_publish_sent(),
            Err(error) => {
                warn!(
                    target: "handraise.coordinator",
                    participant_id = %self.local.participant_id,
                    kind = message.kind_label(),
                    error = %error,
                    "Publish failed, peers may hold a stale view"
                );
                self.metrics.record_publish_failure();
            }
        }
    }

    /// Current snapshot. `is_hand_raised` is derived by membership so every
    /// mutation path keeps it consistent.
    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            entries: self.queue.entries().to_vec(),
            is_hand_raised: self.queue.contains(&self.local.participant_id),
        }
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Transport that records publish calls and delivers nothing.
    #[derive(Debug, Default)]
    struct RecordingTransport {
        publishes: AtomicU64,
    }

    impl RecordingTransport {
        fn publishes(&self) -> u64 {
            self.publishes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RoomTransport for RecordingTransport {
        async fn publish(
            &self,
            _payload: Bytes,
            _options: PublishOptions,
        ) -> Result<(), TransportError> {
            self.publishes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Transport that always refuses.
    #[derive(Debug, Default)]
    struct FailingTransport;

    #[async_trait]
    impl RoomTransport for FailingTransport {
        async fn publish(
            &self,
            _payload: Bytes,
            _options: PublishOptions,
        ) -> Result<(), TransportError> {
            Err(TransportError::PublishFailed("room gone".to_string()))
        }
    }

    fn test_local() -> LocalParticipant {
        LocalParticipant::new("p-local", "Local", "local-identity")
    }

    fn spawn_with_transport(
        transport: Arc<dyn RoomTransport>,
    ) -> (
        HandRaiseCoordinatorHandle,
        JoinHandle<()>,
        mpsc::Sender<DataPacket>,
        Arc<CoordinatorMetrics>,
    ) {
        let (inbound_tx, inbound_rx) = mpsc::channel(16);
        let metrics = CoordinatorMetrics::new();
        let (handle, task) = HandRaiseCoordinator::spawn(
            test_local(),
            CoordinatorConfig::default(),
            transport,
            inbound_rx,
            CancellationToken::new(),
            Arc::clone(&metrics),
        );
        (handle, task, inbound_tx, metrics)
    }

    #[tokio::test]
    async fn test_coordinator_spawn_and_cancel() {
        let (handle, task, _inbound, _metrics) =
            spawn_with_transport(Arc::new(RecordingTransport::default()));

        assert_eq!(handle.participant_id(), "p-local");
        assert!(!handle.is_cancelled());

        handle.cancel();
        assert!(handle.is_cancelled());

        let result = tokio::time::timeout(std::time::Duration::from_secs(1), task).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_raise_is_idempotent() {
        let transport = Arc::new(RecordingTransport::default());
        let (handle, _task, _inbound, _metrics) =
            spawn_with_transport(Arc::clone(&transport) as Arc<dyn RoomTransport>);

        handle.raise_hand().await.unwrap();
        handle.raise_hand().await.unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.entries.len(), 1);
        assert!(snapshot.is_hand_raised);

        // Second raise must not re-broadcast.
        assert_eq!(transport.publishes(), 1);

        handle.cancel();
    }

    #[tokio::test]
    async fn test_lower_defaults_to_local() {
        let (handle, _task, _inbound, _metrics) =
            spawn_with_transport(Arc::new(RecordingTransport::default()));

        handle.raise_hand().await.unwrap();
        handle.lower_hand(None).await.unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.entries.is_empty());
        assert!(!snapshot.is_hand_raised);

        handle.cancel();
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_optimistic_state() {
        let (handle, _task, _inbound, metrics) =
            spawn_with_transport(Arc::new(FailingTransport));

        handle.raise_hand().await.unwrap();

        // The broadcast failed but the local replica kept the update.
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.is_hand_raised);
        assert_eq!(metrics.publish_failures(), 1);
        assert_eq!(metrics.publishes_sent(), 0);

        handle.cancel();
    }

    #[tokio::test]
    async fn test_sync_on_empty_queue_is_noop() {
        let transport = Arc::new(RecordingTransport::default());
        let (handle, _task, _inbound, _metrics) =
            spawn_with_transport(Arc::clone(&transport) as Arc<dyn RoomTransport>);

        handle.sync_queue().await.unwrap();
        assert_eq!(transport.publishes(), 0);

        handle.cancel();
    }

    #[tokio::test]
    async fn test_foreign_topic_is_ignored() {
        let (handle, _task, inbound, metrics) =
            spawn_with_transport(Arc::new(RecordingTransport::default()));

        inbound
            .send(DataPacket {
                payload: Bytes::from_static(b"{\"type\":\"hand-clear\"}"),
                sender: crate::transport::SenderInfo {
                    participant_id: "p-x".to_string(),
                    identity: "x".to_string(),
                    name: "X".to_string(),
                },
                topic: "chat".to_string(),
            })
            .await
            .unwrap();

        // Give the actor a moment to process the packet.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.entries.is_empty());
        assert_eq!(metrics.foreign_topic_ignored(), 1);
        assert_eq!(metrics.decode_failures(), 0);

        handle.cancel();
    }

    #[tokio::test]
    async fn test_watch_sees_updates() {
        let (handle, _task, _inbound, _metrics) =
            spawn_with_transport(Arc::new(RecordingTransport::default()));

        let mut watch_rx = handle.watch();
        assert!(!watch_rx.borrow().is_hand_raised);

        handle.raise_hand().await.unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(1), watch_rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(watch_rx.borrow().is_hand_raised);

        handle.cancel();
    }

    #[tokio::test]
    async fn test_inbound_stream_end_keeps_reads_alive() {
        let (handle, _task, inbound, _metrics) =
            spawn_with_transport(Arc::new(RecordingTransport::default()));

        handle.raise_hand().await.unwrap();
        drop(inbound);

        // Give the actor a moment to observe the closed stream.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.is_hand_raised);

        handle.cancel();
    }
}
