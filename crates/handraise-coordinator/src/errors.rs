//! Coordinator error types.
//!
//! The protocol itself has no caller-visible failure path: lost broadcasts
//! and malformed inbound payloads degrade to a stale local view. These
//! errors only cover the actor harness around it.

use thiserror::Error;

/// Coordinator error type.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The actor's mailbox is gone (coordinator cancelled or stopped).
    #[error("Internal error: {0}")]
    Internal(String),

    /// The room transport could not be set up.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl CoordinatorError {
    /// Returns a bounded label string for the error variant (for metrics).
    ///
    /// Uses variant names, not error message content, so label cardinality
    /// stays bounded.
    #[must_use]
    pub const fn error_type_label(&self) -> &'static str {
        match self {
            CoordinatorError::Internal(_) => "internal",
            CoordinatorError::Transport(_) => "transport",
        }
    }
}
