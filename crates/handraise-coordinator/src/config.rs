//! Coordinator configuration.
//!
//! The coordinator is embedded in an existing room session, so configuration
//! is plain values with defaults rather than environment loading.

/// Default data-channel topic for hand-raise traffic.
pub const DEFAULT_DATA_TOPIC: &str = "hand-raise";

/// Default mailbox buffer size for the coordinator actor.
pub const DEFAULT_MAILBOX_BUFFER: usize = 64;

/// The participant this coordinator speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalParticipant {
    /// Session-scoped participant identifier. Stable for the lifetime of
    /// the connection, not across reconnects.
    pub participant_id: String,
    /// Display name, stamped into raise entries.
    pub participant_name: String,
    /// Longer-lived identity, recorded on entries for display/audit.
    pub identity: String,
}

impl LocalParticipant {
    /// Create a local participant descriptor.
    #[must_use]
    pub fn new(
        participant_id: impl Into<String>,
        participant_name: impl Into<String>,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            participant_name: participant_name.into(),
            identity: identity.into(),
        }
    }
}

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Data-channel topic to publish on and accept packets from
    /// (default: `"hand-raise"`).
    pub topic: String,
    /// Whether publishes request transport-level retransmission
    /// (default: true).
    pub reliable: bool,
    /// Mailbox buffer size for the coordinator actor (default: 64).
    pub mailbox_buffer: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_DATA_TOPIC.to_string(),
            reliable: true,
            mailbox_buffer: DEFAULT_MAILBOX_BUFFER,
        }
    }
}

impl CoordinatorConfig {
    /// Override the data-channel topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Override the reliable-publish flag.
    #[must_use]
    pub fn with_reliable(mut self, reliable: bool) -> Self {
        self.reliable = reliable;
        self
    }

    /// Override the mailbox buffer size.
    #[must_use]
    pub fn with_mailbox_buffer(mut self, mailbox_buffer: usize) -> Self {
        self.mailbox_buffer = mailbox_buffer;
        self
    }
}
