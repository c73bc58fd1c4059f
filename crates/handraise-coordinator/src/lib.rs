//! Hand-Raise Coordinator
//!
//! This library keeps a raised-hands queue loosely synchronized across the
//! participants of a video room. There is no server and no authority: every
//! participant runs its own coordinator, which owns a local queue replica and
//! converges with its peers by exchanging broadcast messages over the room's
//! data channel.
//!
//! # Architecture
//!
//! One coordinator actor per local participant:
//!
//! ```text
//! UI surface
//!   └── HandRaiseCoordinatorHandle (cloneable)
//!         └── HandRaiseCoordinator (tokio task, owns all state)
//!               ├── RaiseQueue replica (handraise-protocol)
//!               ├── publishes via Arc<dyn RoomTransport>
//!               └── consumes DataPacket events from the room adapter
//! ```
//!
//! # Key Design Decisions
//!
//! - **Replica, not shared state**: the queue is converged via messages, not
//!   locked. Two participants can disagree until the next `hand-sync`.
//! - **Fire-and-forget sends**: no acknowledgement, retry, or timeout. A
//!   failed or dropped broadcast degrades to a stale remote view.
//! - **No fatal error path**: malformed inbound payloads are logged and
//!   discarded; the public API only fails if the actor itself is gone.
//! - **No authorization**: any sender may clear or lower; gating privileged
//!   actions is the calling surface's responsibility.
//!
//! # Modules
//!
//! - [`coordinator`] - The actor and its handle
//! - [`transport`] - Seam to the room's data channel
//! - [`config`] - Coordinator configuration
//! - [`errors`] - Error types
//! - [`metrics`] - Atomics-based counters

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod messages;
pub mod metrics;
pub mod transport;
