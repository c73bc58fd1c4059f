//! Peer-synchronized hand-raise queue protocol.
//!
//! This crate implements the wire format and state machine for a raised-hands
//! queue replicated across the participants of a video room. Each participant
//! keeps an independent local replica, mutated only by protocol messages
//! (local or remote) applied through a pure reducer — there is no
//! authoritative copy and no persistence; convergence is best-effort and
//! repaired by explicit `hand-sync` snapshots.
//!
//! The transport is supplied externally: a reliable, ordered-per-sender,
//! best-effort broadcast data channel. This crate never touches it — see the
//! coordinator crate for the actor that does.

#![warn(clippy::pedantic)]

pub mod codec;
pub mod message;
pub mod queue;
