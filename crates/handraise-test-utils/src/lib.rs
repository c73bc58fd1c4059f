//! # Hand-Raise Test Utilities
//!
//! Shared test utilities for the hand-raise coordinator.
//!
//! This crate provides an in-memory room and test fixtures for exercising
//! multi-participant convergence without a real video session.
//!
//! ## Modules
//!
//! - `mock_room` - In-memory reliable broadcast hub standing in for the room
//! - `fixtures` - Pre-configured participants and queue entries
//! - `eventual` - Convergence assertion helper for timing-dependent tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use handraise_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let room = MockRoom::new();
//!     let alice = TestParticipant::new("alice");
//!
//!     let (transport, inbound) = room.attach(&alice.local());
//!     // Spawn a coordinator over transport + inbound, drive it, and use
//!     // assert_eventually for cross-participant convergence checks.
//! }
//! ```

pub mod eventual;
pub mod fixtures;
pub mod mock_room;

// Re-export commonly used items
pub use eventual::*;
pub use fixtures::*;
pub use mock_room::*;
