//! Codec for encoding and decoding hand-raise messages.
//!
//! The wire format is UTF-8 JSON. Decode failure is the protocol's only
//! error path: the caller logs the payload and discards it, leaving state
//! unchanged. There is no acknowledgement or retry.

use crate::message::HandRaiseMessage;
use bytes::Bytes;

/// Error type for codec operations
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Payload is not valid UTF-8 JSON, has an unknown `type`, or is
    /// missing required fields.
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Encode a hand-raise message to a UTF-8 JSON byte buffer.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_message(message: &HandRaiseMessage) -> Result<Bytes, CodecError> {
    let buf = serde_json::to_vec(message)?;
    Ok(Bytes::from(buf))
}

/// Decode a received byte buffer into a typed message.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] for invalid JSON, non-UTF-8 input,
/// an unrecognized `type` tag, or missing required fields.
pub fn decode_message(payload: &[u8]) -> Result<HandRaiseMessage, CodecError> {
    let message = serde_json::from_slice(payload)?;
    Ok(message)
}
