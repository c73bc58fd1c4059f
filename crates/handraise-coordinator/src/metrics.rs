//! Coordinator metrics.
//!
//! Plain atomic counters shared via `Arc`, readable by tests and health
//! surfaces. The protocol is silently best-effort, so these counters are
//! the only place dropped input becomes visible.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared counters for one coordinator.
#[derive(Debug, Default)]
pub struct CoordinatorMetrics {
    /// Inbound protocol messages decoded and applied.
    messages_applied: AtomicU64,
    /// Inbound payloads discarded as malformed or unrecognized.
    decode_failures: AtomicU64,
    /// Broadcasts handed to the transport.
    publishes_sent: AtomicU64,
    /// Broadcasts the transport refused.
    publish_failures: AtomicU64,
    /// Inbound packets ignored because they carried a different topic.
    foreign_topic_ignored: AtomicU64,
}

impl CoordinatorMetrics {
    /// Create new shared metrics.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record an inbound message that was decoded and applied.
    pub fn record_message_applied(&self) {
        self.messages_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an inbound payload discarded at decode.
    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a broadcast handed to the transport.
    pub fn record_publish_sent(&self) {
        self.publishes_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a broadcast the transport refused.
    pub fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an inbound packet with a foreign topic.
    pub fn record_foreign_topic(&self) {
        self.foreign_topic_ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Inbound protocol messages decoded and applied.
    #[must_use]
    pub fn messages_applied(&self) -> u64 {
        self.messages_applied.load(Ordering::Relaxed)
    }

    /// Inbound payloads discarded as malformed or unrecognized.
    #[must_use]
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    /// Broadcasts handed to the transport.
    #[must_use]
    pub fn publishes_sent(&self) -> u64 {
        self.publishes_sent.load(Ordering::Relaxed)
    }

    /// Broadcasts the transport refused.
    #[must_use]
    pub fn publish_failures(&self) -> u64 {
        self.publish_failures.load(Ordering::Relaxed)
    }

    /// Inbound packets ignored because they carried a different topic.
    #[must_use]
    pub fn foreign_topic_ignored(&self) -> u64 {
        self.foreign_topic_ignored.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = CoordinatorMetrics::new();
        assert_eq!(metrics.messages_applied(), 0);
        assert_eq!(metrics.decode_failures(), 0);
        assert_eq!(metrics.publishes_sent(), 0);
        assert_eq!(metrics.publish_failures(), 0);
        assert_eq!(metrics.foreign_topic_ignored(), 0);
    }

    #[test]
    fn test_record_and_read() {
        let metrics = CoordinatorMetrics::new();
        metrics.record_message_applied();
        metrics.record_message_applied();
        metrics.record_decode_failure();
        metrics.record_publish_sent();
        metrics.record_publish_failure();
        metrics.record_foreign_topic();

        assert_eq!(metrics.messages_applied(), 2);
        assert_eq!(metrics.decode_failures(), 1);
        assert_eq!(metrics.publishes_sent(), 1);
        assert_eq!(metrics.publish_failures(), 1);
        assert_eq!(metrics.foreign_topic_ignored(), 1);
    }
}
